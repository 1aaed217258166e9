use crate::areas::repository::Repository;
use std::path::Path;

impl Repository {
    pub fn write_tree(&self) -> anyhow::Result<()> {
        let tree_id = self.build_tree(Path::new(""))?;

        writeln!(self.writer(), "{tree_id}")?;

        Ok(())
    }
}
