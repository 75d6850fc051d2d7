use crate::areas::repository::Repository;
use crate::artifacts::log::rev_walk::RevWalk;
use crate::artifacts::objects::object::{Object, ObjectBox};
use std::io::Write;

impl Repository {
    /// Print the reachable history of a revision as a Graphviz digraph
    ///
    /// One `c_<child> -> c_<parent>;` line per parent link, depth-first in
    /// parent-list order. A diamond-shaped merge ancestry prints each edge
    /// exactly once.
    pub fn log(&mut self, revision: &str) -> anyhow::Result<()> {
        let (start_oid, object) = self.resolve_revision_peeled(revision)?;

        if !matches!(object, ObjectBox::Commit(_)) {
            anyhow::bail!(
                "revision {revision} names a {} object, not a commit",
                object.object_kind()
            );
        }

        writeln!(self.writer(), "digraph log{{")?;
        for edge in RevWalk::new(self.database(), &start_oid)? {
            let (child, parent) = edge?;
            writeln!(self.writer(), "  c_{child} -> c_{parent};")?;
        }
        writeln!(self.writer(), "}}")?;

        Ok(())
    }
}
