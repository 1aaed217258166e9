//! Git object types and the object codec
//!
//! Every stored object is framed as `<type> <size>\0<payload>` and identified
//! by the SHA-1 digest of that frame. There are three object types:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (modes, names and object IDs)
//! - **Commit**: Snapshot metadata (tree, optional parent, authorship, message)

pub mod blob;
pub mod commit;
pub mod cursor;
pub mod entry_mode;
pub mod frame;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const OBJECT_ID_SIZE: usize = OBJECT_ID_LENGTH / 2;
