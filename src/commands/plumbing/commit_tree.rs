use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;

impl Repository {
    pub fn commit_tree(
        &self,
        tree_sha: &str,
        parent_sha: Option<&str>,
        message: &str,
    ) -> anyhow::Result<()> {
        let tree_oid = ObjectId::try_parse(tree_sha).context("Invalid tree id")?;
        let parent = parent_sha
            .map(|sha| ObjectId::try_parse(sha))
            .transpose()
            .context("Invalid parent id")?;

        let commit_id = self.build_commit(tree_oid, parent, message)?;

        writeln!(self.writer(), "{commit_id}")?;

        Ok(())
    }
}
