use crate::areas::refs::RefNode;
use crate::areas::repository::Repository;
use std::collections::BTreeMap;
use std::io::Write;

impl Repository {
    /// Print all tag names, one per line, in lexicographic order
    pub fn list_tags(&mut self) -> anyhow::Result<()> {
        if !self.refs().tags_path().exists() {
            return Ok(());
        }

        let listing = self.refs().list("refs/tags")?;
        self.print_tag_names(&listing, "")?;

        Ok(())
    }

    fn print_tag_names(
        &self,
        listing: &BTreeMap<String, RefNode>,
        prefix: &str,
    ) -> anyhow::Result<()> {
        for (name, node) in listing {
            match node {
                RefNode::Direct(_) => writeln!(self.writer(), "{prefix}{name}")?,
                RefNode::Namespace(nested) => {
                    self.print_tag_names(nested, &format!("{prefix}{name}/"))?
                }
            }
        }

        Ok(())
    }

    /// Create a lightweight tag pointing at a revision
    pub fn create_tag(&mut self, name: &str, revision: &str) -> anyhow::Result<()> {
        let oid = self.resolve_revision(revision)?;
        let ref_path = format!("refs/tags/{name}");

        if self.refs().ref_exists(&ref_path) {
            anyhow::bail!("tag {name} already exists");
        }

        self.refs()
            .update_ref_file(&ref_path, oid.as_ref().to_string())?;

        Ok(())
    }
}
