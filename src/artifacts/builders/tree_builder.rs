//! Recursive tree building
//!
//! A directory becomes a tree object: every regular file is stored as a blob,
//! every subdirectory is built into a nested tree first (children before
//! parents), and the collected entries are framed and stored as the tree.
//!
//! Entries are sorted canonically before framing so that the same logical
//! directory always produces the same tree id, whatever order the listing
//! returned. Any failure aborts the whole build; objects stored before the
//! failure stay in the store, unreferenced.

use crate::areas::database::ObjectStore;
use crate::areas::workspace::{DirectoryListing, EntryKind};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::ObjectResult;
use bytes::Bytes;
use std::path::Path;
use tracing::debug;

/// Name of the repository metadata directory, never snapshotted
pub const METADATA_DIR: &str = ".git";

pub struct TreeBuilder<'a, W, S> {
    workspace: &'a W,
    store: &'a S,
    ignored: &'a str,
}

impl<'a, W, S> TreeBuilder<'a, W, S>
where
    W: DirectoryListing,
    S: ObjectStore,
{
    pub fn new(workspace: &'a W, store: &'a S) -> Self {
        TreeBuilder {
            workspace,
            store,
            ignored: METADATA_DIR,
        }
    }

    /// Skip directories with this exact name instead of the default metadata directory
    pub fn ignoring(mut self, name: &'a str) -> Self {
        self.ignored = name;
        self
    }

    /// Store the file at `path` as a blob
    pub fn write_blob(&self, path: &Path) -> ObjectResult<ObjectId> {
        let blob = Blob::new(self.workspace.read_file(path)?);
        let oid = self.store.store(&blob)?;
        debug!(path = %path.display(), %oid, "wrote blob");

        Ok(oid)
    }

    /// Build and store the tree for `dir_path`, returning its id
    pub fn build(&self, dir_path: &Path) -> ObjectResult<ObjectId> {
        let mut tree = Tree::default();

        for entry in self.workspace.list_dir(dir_path)? {
            let path = dir_path.join(&entry.name);

            let (mode, oid) = match entry.kind {
                EntryKind::Directory if entry.name == *self.ignored => {
                    debug!(path = %path.display(), "skipping metadata directory");
                    continue;
                }
                EntryKind::Directory => (EntryMode::Directory, self.build(&path)?),
                EntryKind::File { permissions } => {
                    (EntryMode::from_permissions(permissions), self.write_blob(&path)?)
                }
            };

            debug!(%mode, name = ?entry.name, %oid, "tree entry");
            let name = Bytes::from(entry.name.into_encoded_bytes());
            tree.push(TreeEntry::new(mode, name, oid));
        }

        tree.sort_entries();
        let oid = self.store.store(&tree)?;
        debug!(path = %dir_path.display(), %oid, entries = tree.len(), "wrote tree");

        Ok(oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::memory::{InMemoryDatabase, InMemoryWorkspace};
    use crate::artifacts::objects::object_type::ObjectType;
    use crate::errors::ObjectError;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace() -> InMemoryWorkspace {
        let mut workspace = InMemoryWorkspace::new();
        workspace.add_file("hello.txt", "world", 0o644).add_dir("sub");
        workspace
    }

    #[rstest]
    fn test_file_and_empty_directory(workspace: InMemoryWorkspace) {
        let database = InMemoryDatabase::new();

        let oid = TreeBuilder::new(&workspace, &database)
            .build(Path::new(""))
            .unwrap();

        let tree = database.parse_object_as_tree(&oid).unwrap().unwrap();
        let entries = tree.entries().collect::<Vec<_>>();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].name, "hello.txt");
        assert_eq!(entries[0].mode, EntryMode::File(0o644));
        let (object_type, _) = database.read_header(&entries[0].oid).unwrap();
        assert_eq!(object_type, ObjectType::Blob);
        assert_eq!(&database.read_payload(&entries[0].oid).unwrap()[..], b"world");

        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].mode, EntryMode::Directory);
        let subtree = database.parse_object_as_tree(&entries[1].oid).unwrap().unwrap();
        assert!(subtree.is_empty());

        pretty_assertions::assert_eq!(oid.to_string(), "8b01356fc87b6229c8ff1151a7653a7ae9af5c04");
        // blob, empty tree, root tree
        assert_eq!(database.len(), 3);
    }

    #[test]
    fn test_listing_order_does_not_change_the_tree_id() {
        let mut forward = InMemoryWorkspace::new();
        forward
            .add_file("a.txt", "a", 0o644)
            .add_file("b/c.txt", "c", 0o755)
            .add_file("b.txt", "b", 0o644);
        let mut backward = InMemoryWorkspace::new();
        backward
            .add_file("b.txt", "b", 0o644)
            .add_file("b/c.txt", "c", 0o755)
            .add_file("a.txt", "a", 0o644);
        let database = InMemoryDatabase::new();

        let first = TreeBuilder::new(&forward, &database).build(Path::new("")).unwrap();
        let second = TreeBuilder::new(&backward, &database).build(Path::new("")).unwrap();

        assert_eq!(first, second);
        let names = database
            .parse_object_as_tree(&first)
            .unwrap()
            .unwrap()
            .into_entries()
            .map(|entry| entry.name)
            .collect::<Vec<_>>();
        pretty_assertions::assert_eq!(names, vec!["a.txt", "b.txt", "b"]);
    }

    #[rstest]
    fn test_metadata_directory_is_skipped(mut workspace: InMemoryWorkspace) {
        let database = InMemoryDatabase::new();
        let expected = TreeBuilder::new(&workspace, &database)
            .build(Path::new(""))
            .unwrap();

        workspace.add_file(".git/HEAD", "ref: refs/heads/master\n", 0o644);
        let oid = TreeBuilder::new(&workspace, &database)
            .build(Path::new(""))
            .unwrap();

        assert_eq!(oid, expected);
    }

    #[rstest]
    fn test_custom_ignored_directory(mut workspace: InMemoryWorkspace) {
        let database = InMemoryDatabase::new();
        workspace.add_file(".store/objects/xx", "x", 0o644);
        workspace.add_file(".git", "a file, not a directory", 0o644);

        let oid = TreeBuilder::new(&workspace, &database)
            .ignoring(".store")
            .build(Path::new(""))
            .unwrap();

        let names = database
            .parse_object_as_tree(&oid)
            .unwrap()
            .unwrap()
            .into_entries()
            .map(|entry| entry.name)
            .collect::<Vec<_>>();
        pretty_assertions::assert_eq!(names, vec![".git", "hello.txt", "sub"]);
    }

    #[rstest]
    fn test_nested_directories_recurse(mut workspace: InMemoryWorkspace) {
        let database = InMemoryDatabase::new();
        workspace.add_file("sub/inner/deep.txt", "deep", 0o600);

        let oid = TreeBuilder::new(&workspace, &database)
            .build(Path::new(""))
            .unwrap();

        let root = database.parse_object_as_tree(&oid).unwrap().unwrap();
        let sub = root.entries().find(|entry| entry.name == "sub").unwrap();
        let sub = database.parse_object_as_tree(&sub.oid).unwrap().unwrap();
        let inner = sub.entries().next().unwrap();
        assert_eq!(inner.name, "inner");
        let inner = database.parse_object_as_tree(&inner.oid).unwrap().unwrap();
        let deep = inner.entries().next().unwrap();
        assert_eq!(deep.mode.as_string(), "100600");
        assert_eq!(&database.read_payload(&deep.oid).unwrap()[..], b"deep");
    }

    #[test]
    fn test_missing_directory_aborts_the_build() {
        let workspace = InMemoryWorkspace::new();
        let database = InMemoryDatabase::new();

        let result = TreeBuilder::new(&workspace, &database).build(Path::new("missing"));

        assert!(matches!(result, Err(ObjectError::Io { .. })));
        assert!(database.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_name_is_stored_as_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let mut workspace = InMemoryWorkspace::new();
        workspace.add_file(std::ffi::OsStr::from_bytes(b"caf\xe9.txt"), "latin-1", 0o644);
        let database = InMemoryDatabase::new();

        let oid = TreeBuilder::new(&workspace, &database)
            .build(Path::new(""))
            .unwrap();

        let tree = database.parse_object_as_tree(&oid).unwrap().unwrap();
        let entry = tree.entries().next().unwrap();
        assert_eq!(&entry.name[..], b"caf\xe9.txt");
        assert_eq!(&database.read_payload(&entry.oid).unwrap()[..], b"latin-1");
    }
}
