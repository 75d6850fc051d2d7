use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::collections::HashSet;

/// One parent link in the history graph
pub type HistoryEdge = (ObjectId, ObjectId);

/// Lazy depth-first walk over the commit graph, yielding `(child, parent)`
/// edges in parent-list order.
///
/// A visited set makes re-convergent paths terminate instead of re-expand:
/// a diamond-shaped merge ancestry yields every edge exactly once, and the
/// shared ancestor is fetched exactly once. A root commit simply ends its
/// branch of the walk.
///
/// Commits are fetched one step at a time, so the caller can abandon the
/// iterator early without any cleanup.
pub struct RevWalk<'d> {
    database: &'d Database,
    visited: HashSet<ObjectId>,
    /// One frame per commit being expanded: its address and the parents
    /// not yet emitted
    stack: Vec<(ObjectId, std::vec::IntoIter<ObjectId>)>,
}

impl<'d> RevWalk<'d> {
    pub fn new(database: &'d Database, start: &ObjectId) -> anyhow::Result<Self> {
        let mut walk = RevWalk {
            database,
            visited: HashSet::new(),
            stack: Vec::new(),
        };

        walk.visited.insert(start.clone());
        walk.push_frame(start)?;

        Ok(walk)
    }

    fn push_frame(&mut self, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self
            .database
            .parse_object_as_commit(oid)?
            .with_context(|| format!("object {oid} is not a commit"))?;

        self.stack.push((oid.clone(), commit.parents()?.into_iter()));

        Ok(())
    }
}

impl Iterator for RevWalk<'_> {
    type Item = anyhow::Result<HistoryEdge>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (oid, parents) = self.stack.last_mut()?;

            match parents.next() {
                None => {
                    // commit fully expanded; resume its child frame
                    self.stack.pop();
                }
                Some(parent) => {
                    let edge = (oid.clone(), parent.clone());

                    if self.visited.insert(parent.clone()) {
                        if let Err(err) = self.push_frame(&parent) {
                            return Some(Err(err));
                        }
                    }

                    return Some(Ok(edge));
                }
            }
        }
    }
}
