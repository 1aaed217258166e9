//! Error taxonomy for object encoding, decoding and storage
//!
//! Every fallible operation of the object layer returns an [`ObjectError`].
//! Writing an object that already exists is not an error: the store treats it
//! as a successful no-op.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// No object is stored under the derived path.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The stored stream could not be decompressed.
    #[error("corrupt object {oid}: {source}")]
    CorruptObject {
        oid: ObjectId,
        #[source]
        source: std::io::Error,
    },

    /// A header, tree entry or commit field is missing its expected delimiters.
    #[error("malformed object: {0}")]
    MalformedObject(String),

    /// The given text is not a 40 character hexadecimal object id.
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    /// Underlying read/write/permission failure of the storage medium.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ObjectResult<T> = Result<T, ObjectError>;

impl ObjectError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ObjectError::MalformedObject(reason.into())
    }

    /// Adapter for `map_err` that attaches the path being accessed.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| ObjectError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
