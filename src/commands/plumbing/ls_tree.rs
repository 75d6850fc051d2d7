use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// List the entries of the tree a revision names
    ///
    /// A commit revision lists its snapshot tree.
    pub fn ls_tree(&mut self, revision: &str) -> anyhow::Result<()> {
        let (oid, object) = self.resolve_revision_peeled(revision)?;

        let tree = match object {
            ObjectBox::Tree(tree) => *tree,
            ObjectBox::Commit(commit) => {
                let tree_oid = commit.tree_oid()?;
                self.database()
                    .parse_object_as_tree(&tree_oid)?
                    .with_context(|| format!("commit tree {tree_oid} is not a tree"))?
            }
            _ => anyhow::bail!("object {oid} has no tree to list"),
        };

        for entry in tree.entries() {
            let kind = self.database().kind_of(entry.oid())?;
            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode(),
                kind,
                entry.oid(),
                entry.name()
            )?;
        }

        Ok(())
    }
}
