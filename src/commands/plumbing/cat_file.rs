use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

/// What `cat-file` prints about an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatFileMode {
    Pretty,
    Type,
    Size,
}

impl Repository {
    pub fn cat_file(&self, object_id: &str, mode: CatFileMode) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_id)?;
        let mut writer = self.writer();

        match mode {
            CatFileMode::Type => {
                let (object_type, _) = self.database().read_header(&oid)?;
                writeln!(writer, "{object_type}")?;
            }
            CatFileMode::Size => {
                let (_, size) = self.database().read_header(&oid)?;
                writeln!(writer, "{size}")?;
            }
            CatFileMode::Pretty => match self.database().parse_object(&oid)? {
                // blobs may be binary, so they are written untouched
                ObjectBox::Blob(blob) => writer.write_all(blob.content())?,
                ObjectBox::Tree(tree) => {
                    if !tree.is_empty() {
                        writeln!(writer, "{}", tree.display())?;
                    }
                }
                ObjectBox::Commit(commit) => write!(writer, "{}", commit.display())?,
            },
        }

        writer.flush()?;

        Ok(())
    }
}
