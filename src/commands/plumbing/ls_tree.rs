use crate::areas::database::ObjectStore;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::iterate_tree;
use std::io::Write;

impl Repository {
    /// List a tree's entries; a commit id lists the commit's tree
    pub fn ls_tree(&self, object_id: &str, name_only: bool) -> anyhow::Result<()> {
        let oid = ObjectId::try_parse(object_id)?;

        let mut frame = self.database().read_frame(&oid)?;
        if frame.object_type() == ObjectType::Commit {
            let commit = Commit::deserialize(frame.into_payload())?;
            frame = self.database().read_frame(commit.tree_oid())?;
        }
        if frame.object_type() != ObjectType::Tree {
            anyhow::bail!("{oid} is a {}, not a tree object", frame.object_type());
        }

        let mut writer = self.writer();
        for entry in iterate_tree(frame.payload()) {
            let entry = entry?;

            if !name_only {
                write!(
                    writer,
                    "{:06o} {} {}\t",
                    entry.mode.as_u32(),
                    entry.mode.object_type(),
                    entry.oid
                )?;
            }
            // names are raw bytes and are written untouched
            writer.write_all(&entry.name)?;
            writeln!(writer)?;
        }

        Ok(())
    }
}
