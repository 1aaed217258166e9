use crate::areas::database::{Database, ObjectStore};
use crate::areas::workspace::Workspace;
use crate::artifacts::builders::commit_builder;
use crate::artifacts::builders::tree_builder::{METADATA_DIR, TreeBuilder};
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::ObjectResult;
use bytes::Bytes;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Handle on a repository rooted at an explicit path
///
/// Layout: `<root>/.git/objects` (object database), `<root>/.git/refs` and the
/// `<root>/.git/HEAD` pointer file. Every operation works relative to this
/// handle; nothing depends on the process working directory.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
}

impl Repository {
    pub fn new(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let database = Database::new(path.join(METADATA_DIR).join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
        })
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.git_path().join("refs")
    }

    pub fn head_path(&self) -> PathBuf {
        self.git_path().join("HEAD")
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    fn tree_builder(&self) -> TreeBuilder<'_, Workspace, Database> {
        TreeBuilder::new(&self.workspace, &self.database)
    }

    /// Store the content of a workspace file as a blob
    pub fn put_blob(&self, file_path: &Path) -> ObjectResult<ObjectId> {
        self.tree_builder().write_blob(file_path)
    }

    /// Snapshot a workspace directory (relative to the root) into trees and blobs
    pub fn build_tree(&self, dir_path: &Path) -> ObjectResult<ObjectId> {
        self.tree_builder().build(dir_path)
    }

    /// Store a commit authored by the configured identity at the current time
    pub fn build_commit(
        &self,
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        message: &str,
    ) -> ObjectResult<ObjectId> {
        commit_builder::build_commit(
            &self.database,
            tree_oid,
            parent,
            Author::load_from_env(),
            message,
        )
    }

    pub fn get_object(&self, oid: &ObjectId) -> ObjectResult<(ObjectType, Bytes)> {
        let frame = self.database.read_frame(oid)?;
        Ok((frame.object_type(), frame.into_payload()))
    }
}
