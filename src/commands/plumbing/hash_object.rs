use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_kind::ObjectKind;
use anyhow::Context;
use std::io::{Cursor, Write};

impl Repository {
    /// Hash a file as an object of the given kind, optionally storing it
    pub fn hash_object(&mut self, file: &str, kind: ObjectKind, write: bool) -> anyhow::Result<()> {
        let data = std::fs::read(self.path().join(file))
            .with_context(|| format!("Unable to read file {file}"))?;

        // run the payload through the matching codec so a malformed
        // tree/commit/tag is rejected instead of stored
        let object = ObjectBox::parse(kind, Cursor::new(data))?;

        let oid = if write {
            self.database().store(&object)?
        } else {
            object.object_id()?
        };

        writeln!(self.writer(), "{oid}")?;

        Ok(())
    }
}
