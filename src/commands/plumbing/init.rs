use crate::areas::repository::Repository;
use anyhow::Context;
use std::fs;
use tracing::info;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .git/objects directory")?;

        fs::create_dir_all(self.refs_path()).context("Failed to create .git/refs directory")?;

        // re-running init keeps the current branch pointer
        let head_path = self.head_path();
        if !head_path.exists() {
            fs::write(&head_path, format!("ref: refs/heads/{DEFAULT_BRANCH}\n"))
                .context("Failed to create initial HEAD reference")?;
        }

        info!(path = %self.git_path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
