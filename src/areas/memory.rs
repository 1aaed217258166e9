//! In-memory stand-ins for the object database and the workspace
//!
//! Both keep everything in process memory, which makes tree and commit
//! building testable without touching disk.

use crate::areas::database::ObjectStore;
use crate::areas::workspace::{DirectoryListing, EntryKind, WorkspaceEntry};
use crate::artifacts::objects::frame::identify;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{ObjectError, ObjectResult};
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `HashMap`-based object store holding uncompressed frames
#[derive(Debug, Default)]
pub struct InMemoryDatabase {
    objects: RefCell<HashMap<ObjectId, Bytes>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }
}

impl ObjectStore for InMemoryDatabase {
    fn put(&self, frame: &[u8]) -> ObjectResult<ObjectId> {
        let oid = identify(frame);
        self.objects
            .borrow_mut()
            .entry(oid)
            .or_insert_with(|| Bytes::copy_from_slice(frame));

        Ok(oid)
    }

    fn get(&self, oid: &ObjectId) -> ObjectResult<Bytes> {
        self.objects
            .borrow()
            .get(oid)
            .cloned()
            .ok_or(ObjectError::NotFound(*oid))
    }

    fn exists(&self, oid: &ObjectId) -> bool {
        self.objects.borrow().contains_key(oid)
    }
}

#[derive(Debug, Clone)]
enum Node {
    Directory,
    File { content: Bytes, permissions: u32 },
}

/// Directory hierarchy fixture
///
/// Paths are relative; the root is the empty path. Listings come back in
/// insertion order.
#[derive(Debug, Default)]
pub struct InMemoryWorkspace {
    nodes: Vec<(PathBuf, Node)>,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory, creating missing parents
    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = path.as_ref();
        if path.as_os_str().is_empty() || self.find(path).is_some() {
            return self;
        }
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }

        self.nodes.push((path.to_path_buf(), Node::Directory));
        self
    }

    /// Add a file, creating missing parent directories
    pub fn add_file(
        &mut self,
        path: impl AsRef<Path>,
        content: impl Into<Bytes>,
        permissions: u32,
    ) -> &mut Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }

        let node = Node::File {
            content: content.into(),
            permissions,
        };
        match self.nodes.iter_mut().find(|(p, _)| p == path) {
            Some((_, existing)) => *existing = node,
            None => self.nodes.push((path.to_path_buf(), node)),
        }
        self
    }

    fn find(&self, path: &Path) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, node)| node)
    }

    fn not_found(path: &Path, what: &str) -> ObjectError {
        ObjectError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, format!("no such {what}")),
        }
    }
}

impl DirectoryListing for InMemoryWorkspace {
    fn list_dir(&self, dir_path: &Path) -> ObjectResult<Vec<WorkspaceEntry>> {
        let is_root = dir_path.as_os_str().is_empty();
        if !is_root && !matches!(self.find(dir_path), Some(Node::Directory)) {
            return Err(Self::not_found(dir_path, "directory"));
        }

        Ok(self
            .nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir_path))
            .filter_map(|(path, node)| {
                let name = path.file_name()?.to_os_string();
                let kind = match node {
                    Node::Directory => EntryKind::Directory,
                    Node::File { permissions, .. } => EntryKind::File {
                        permissions: *permissions,
                    },
                };
                Some(WorkspaceEntry::new(name, kind))
            })
            .collect())
    }

    fn read_file(&self, file_path: &Path) -> ObjectResult<Bytes> {
        match self.find(file_path) {
            Some(Node::File { content, .. }) => Ok(content.clone()),
            _ => Err(Self::not_found(file_path, "file")),
        }
    }
}
