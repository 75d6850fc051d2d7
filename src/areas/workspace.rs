use crate::areas::database::Database;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::KegError;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

/// A directory on disk into which tree objects are materialized
///
/// The destination is validated once, up front: it must exist, be a
/// directory, and be empty, so a checkout can never clobber unrelated
/// content. There is no rollback: a failure partway through the walk
/// leaves the destination partially populated, and callers that need
/// atomicity should materialize into a scratch directory and rename.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Materialize a tree object into the workspace directory
    ///
    /// Walks the tree depth-first: tree entries become subdirectories,
    /// blob entries become files. A commit or tag entry is not a valid
    /// tree member and fails with `UnsupportedEntryKind`.
    pub fn materialize(&self, database: &Database, tree_oid: &ObjectId) -> anyhow::Result<()> {
        if !self.path.is_dir() {
            return Err(KegError::NotADirectory(self.path.to_path_buf()).into());
        }
        if self.path.read_dir()?.next().is_some() {
            return Err(KegError::NotEmptyDestination(self.path.to_path_buf()).into());
        }

        let tree = database
            .parse_object_as_tree(tree_oid)?
            .with_context(|| format!("object {tree_oid} is not a tree"))?;

        self.materialize_tree(database, &tree, &self.path)
    }

    fn materialize_tree(
        &self,
        database: &Database,
        tree: &Tree,
        destination: &Path,
    ) -> anyhow::Result<()> {
        for entry in tree.entries() {
            let entry_path = destination.join(entry.name());

            match database.parse_object(entry.oid())? {
                ObjectBox::Tree(subtree) => {
                    std::fs::create_dir(&entry_path).with_context(|| {
                        format!("Failed to create directory {}", entry_path.display())
                    })?;
                    self.materialize_tree(database, &subtree, &entry_path)?;
                }
                ObjectBox::Blob(blob) => {
                    self.write_file(&entry_path, blob.content())?;

                    #[cfg(unix)]
                    {
                        use std::os::unix::fs::PermissionsExt;
                        let permissions =
                            std::fs::Permissions::from_mode(entry.mode().as_u32());
                        std::fs::set_permissions(&entry_path, permissions).with_context(
                            || format!("Failed to set permissions on {}", entry_path.display()),
                        )?;
                    }
                }
                other => {
                    return Err(KegError::UnsupportedEntryKind(other.object_kind()).into());
                }
            }
        }

        Ok(())
    }

    fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(file_path)
            .with_context(|| format!("Failed to open file {}", file_path.display()))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file {}", file_path.display()))?;

        Ok(())
    }
}
