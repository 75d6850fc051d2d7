use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the control directory at the repository root
pub const CONTROL_DIR: &str = ".keg";

/// A repository: a working directory with a control directory inside it
///
/// Wires the object database and the reference store together and carries
/// the output writer commands print through.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let database = Database::new(
            path.join(CONTROL_DIR).join("objects").into_boxed_path(),
        );
        let refs = Refs::new(path.join(CONTROL_DIR).into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn control_path(&self) -> Box<Path> {
        self.path.join(CONTROL_DIR).into_boxed_path()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Resolve a revision string to an object address
    ///
    /// A 40-hex-digit string is taken as a literal address; anything else
    /// is tried as a reference path under the control directory root,
    /// `refs/`, `refs/tags/`, and `refs/heads/`, in that order.
    pub fn resolve_revision(&self, revision: &str) -> anyhow::Result<ObjectId> {
        if revision.len() == OBJECT_ID_LENGTH
            && revision.chars().all(|c| c.is_ascii_hexdigit())
        {
            return ObjectId::try_parse(revision.to_string());
        }

        [
            revision.to_string(),
            format!("refs/{revision}"),
            format!("refs/tags/{revision}"),
            format!("refs/heads/{revision}"),
        ]
        .iter()
        .find(|candidate| self.refs.ref_exists(candidate))
        .map(|candidate| self.refs.resolve(candidate))
        .unwrap_or_else(|| Err(anyhow::anyhow!("unknown revision {revision}")))
    }

    /// Resolve a revision and peel annotated tags down to their target
    ///
    /// Returns the final object together with its address, so callers can
    /// dispatch on what the revision ultimately names.
    pub fn resolve_revision_peeled(
        &self,
        revision: &str,
    ) -> anyhow::Result<(ObjectId, ObjectBox)> {
        let mut oid = self.resolve_revision(revision)?;

        loop {
            match self.database.parse_object(&oid)? {
                ObjectBox::Tag(tag) => oid = tag.target_oid()?,
                object => return Ok((oid, object)),
            }
        }
    }
}
