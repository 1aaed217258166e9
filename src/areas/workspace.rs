use crate::errors::{ObjectError, ObjectResult};
use bytes::Bytes;
use derive_new::new;
use std::ffi::OsString;
use std::path::Path;
use walkdir::WalkDir;

/// What a directory entry is, as far as tree building is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// Regular file with its permission bits
    File { permissions: u32 },
}

/// A directory entry; the name is kept as the platform gave it
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct WorkspaceEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

/// Read access to a directory hierarchy
///
/// Entries are returned in whatever order the source provides them.
pub trait DirectoryListing {
    fn list_dir(&self, dir_path: &Path) -> ObjectResult<Vec<WorkspaceEntry>>;

    fn read_file(&self, file_path: &Path) -> ObjectResult<Bytes>;
}

/// Working directory on the local file system
///
/// Relative paths are resolved against the workspace root. Symbolic links
/// are not followed: listing a directory that contains one fails, as does any
/// entry that is neither a regular file nor a directory.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    #[cfg(unix)]
    fn permissions(metadata: &std::fs::Metadata) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o777
    }

    #[cfg(not(unix))]
    fn permissions(metadata: &std::fs::Metadata) -> u32 {
        if metadata.permissions().readonly() {
            0o444
        } else {
            0o644
        }
    }
}

impl DirectoryListing for Workspace {
    fn list_dir(&self, dir_path: &Path) -> ObjectResult<Vec<WorkspaceEntry>> {
        let dir_path = self.path.join(dir_path);

        WalkDir::new(&dir_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .map(|entry| -> ObjectResult<WorkspaceEntry> {
                let entry = entry.map_err(|e| {
                    let path = e.path().unwrap_or(&dir_path).to_path_buf();
                    ObjectError::Io {
                        path,
                        source: e.into(),
                    }
                })?;
                let file_type = entry.file_type();

                let kind = if file_type.is_dir() {
                    EntryKind::Directory
                } else if file_type.is_file() {
                    let metadata = entry.metadata().map_err(|e| ObjectError::Io {
                        path: entry.path().to_path_buf(),
                        source: e.into(),
                    })?;
                    EntryKind::File {
                        permissions: Self::permissions(&metadata),
                    }
                } else {
                    let what = if file_type.is_symlink() {
                        "symbolic links are not supported"
                    } else {
                        "not a regular file or directory"
                    };
                    return Err(ObjectError::Io {
                        path: entry.path().to_path_buf(),
                        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, what),
                    });
                };

                Ok(WorkspaceEntry::new(entry.file_name().to_os_string(), kind))
            })
            .collect()
    }

    fn read_file(&self, file_path: &Path) -> ObjectResult<Bytes> {
        let file_path = self.path.join(file_path);

        std::fs::read(&file_path)
            .map(Bytes::from)
            .map_err(ObjectError::io(&file_path))
    }
}
