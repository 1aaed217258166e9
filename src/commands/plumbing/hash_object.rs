use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::areas::workspace::DirectoryListing;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub fn hash_object(&self, object_path: &Path, write: bool) -> anyhow::Result<()> {
        let content = self
            .workspace()
            .read_file(object_path)
            .with_context(|| format!("Unable to read {}", object_path.display()))?;
        let blob = Blob::new(content);

        let object_id = if write {
            self.database().store(&blob)?
        } else {
            blob.object_id()
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
