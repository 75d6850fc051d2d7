use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    /// Print the decoded content of the object a revision names
    pub fn cat_file(&mut self, revision: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        let object = self.database().parse_object(&oid)?;

        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }
}
