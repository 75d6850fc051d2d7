use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object::{Object, ObjectBox};
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Materialize the tree of a revision into a directory
    ///
    /// The directory is created when absent; an existing directory must be
    /// empty. A commit revision checks out its snapshot tree.
    pub fn checkout(&mut self, revision: &str, destination: &str) -> anyhow::Result<()> {
        let (oid, object) = self.resolve_revision_peeled(revision)?;

        let tree_oid = match object {
            ObjectBox::Commit(commit) => commit.tree_oid()?,
            ObjectBox::Tree(_) => oid.clone(),
            other => anyhow::bail!("cannot checkout a {} object", other.object_kind()),
        };

        let destination = Path::new(destination);
        if !destination.exists() {
            std::fs::create_dir_all(destination)?;
        }

        let workspace = Workspace::new(destination.canonicalize()?.into_boxed_path());
        workspace.materialize(self.database(), &tree_oid)?;

        writeln!(
            self.writer(),
            "Checked out {} into {}",
            oid.to_short_oid(),
            workspace.path().display()
        )?;

        Ok(())
    }
}
