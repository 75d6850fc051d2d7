use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print every reference under `refs/` with its resolved address
    ///
    /// Output is sorted by reference path, one `<oid> <path>` line each.
    pub fn show_ref(&mut self) -> anyhow::Result<()> {
        for ref_path in self.refs().list_all_refs()? {
            let oid = self.refs().resolve(&ref_path)?;
            writeln!(self.writer(), "{oid} {ref_path}")?;
        }

        Ok(())
    }
}
