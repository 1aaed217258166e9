//! Git object identifier (SHA-1 hash)
//!
//! Object IDs are 20-byte SHA-1 digests, rendered as 40 lowercase hexadecimal
//! characters. They uniquely identify all objects (blobs, trees, commits).
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Short: First 7 characters (e.g., "abc123")
//! - Raw: 20 bytes, as embedded in tree entries
//!
//! ## Storage
//!
//! Objects are stored in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::artifacts::objects::{OBJECT_ID_LENGTH, OBJECT_ID_SIZE};
use crate::errors::{ObjectError, ObjectResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Git object identifier (SHA-1 hash)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_SIZE]);

impl ObjectId {
    /// Parse and validate an object ID from its 40-character hexadecimal form
    pub fn try_parse(id: impl AsRef<str>) -> ObjectResult<Self> {
        let id = id.as_ref();
        if id.len() != OBJECT_ID_LENGTH {
            return Err(ObjectError::InvalidObjectId(format!(
                "expected {OBJECT_ID_LENGTH} characters, got {}: {id:?}",
                id.len()
            )));
        }

        let mut raw = [0; OBJECT_ID_SIZE];
        hex::decode_to_slice(id, &mut raw)
            .map_err(|e| ObjectError::InvalidObjectId(format!("{id:?}: {e}")))?;

        Ok(Self(raw))
    }

    /// Build an object ID from its 20-byte binary form
    ///
    /// Used when decoding tree entries, where IDs are embedded raw.
    pub fn from_raw(raw: &[u8]) -> ObjectResult<Self> {
        let raw: [u8; OBJECT_ID_SIZE] = raw.try_into().map_err(|_| {
            ObjectError::malformed(format!(
                "object id must be {OBJECT_ID_SIZE} bytes, got {}",
                raw.len()
            ))
        })?;

        Ok(Self(raw))
    }

    pub fn from_digest(digest: [u8; OBJECT_ID_SIZE]) -> Self {
        Self(digest)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    /// For example, `abc123...` becomes `ab/c123...`
    pub fn to_path(&self) -> PathBuf {
        let hex = self.to_hex();
        let (dir, file) = hex.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
