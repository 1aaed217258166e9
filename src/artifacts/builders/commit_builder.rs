use crate::areas::database::ObjectStore;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::ObjectResult;
use tracing::debug;

/// Frame and store a commit, returning its id
///
/// The referenced tree and parent are not checked for existence.
pub fn build_commit<S: ObjectStore>(
    store: &S,
    tree_oid: ObjectId,
    parent: Option<ObjectId>,
    author: Author,
    message: &str,
) -> ObjectResult<ObjectId> {
    let commit = Commit::new(tree_oid, parent, author, message.to_string());
    let oid = store.store(&commit)?;
    debug!(%oid, tree = %tree_oid, parent = ?parent.map(|p| p.to_string()), "wrote commit");

    Ok(oid)
}
