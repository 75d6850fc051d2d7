use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Create the control directory layout for a fresh repository
    ///
    /// Seeds `objects/`, `refs/heads/`, `refs/tags/`, and a `HEAD` pointing
    /// at the unborn `master` branch. Re-running on an existing repository
    /// leaves it untouched.
    pub fn init(&mut self) -> anyhow::Result<()> {
        let control_path = self.control_path();

        std::fs::create_dir_all(control_path.join("objects"))?;
        std::fs::create_dir_all(self.refs().heads_path())?;
        std::fs::create_dir_all(self.refs().tags_path())?;

        if !self.refs().head_path().exists() {
            self.refs()
                .update_ref_file(HEAD_REF_NAME, "ref: refs/heads/master".to_string())?;
        }

        writeln!(
            self.writer(),
            "Initialized empty keg repository in {}",
            control_path.display()
        )?;

        Ok(())
    }
}
