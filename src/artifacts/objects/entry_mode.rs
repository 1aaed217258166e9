use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{ObjectError, ObjectResult};

const DIRECTORY_MODE: &str = "40000";
const FILE_MODE_PREFIX: &str = "100";
const PERMISSION_BITS: u32 = 0o777;

/// Tree entry mode
///
/// Directories are tagged `40000`. Regular files carry their permission bits
/// as a 3-digit octal suffix, e.g. `100644` or `100755`.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum EntryMode {
    File(u32),
    Directory,
}

impl EntryMode {
    pub fn from_permissions(permissions: u32) -> Self {
        EntryMode::File(permissions & PERMISSION_BITS)
    }

    /// Mode literal as written into tree entries
    pub fn as_string(&self) -> String {
        match self {
            EntryMode::File(permissions) => format!("{FILE_MODE_PREFIX}{permissions:03o}"),
            EntryMode::Directory => DIRECTORY_MODE.to_string(),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            EntryMode::File(permissions) => 0o100000 | permissions,
            EntryMode::Directory => 0o40000,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::File(_) => ObjectType::Blob,
            EntryMode::Directory => ObjectType::Tree,
        }
    }
}

impl TryFrom<&[u8]> for EntryMode {
    type Error = ObjectError;

    fn try_from(value: &[u8]) -> ObjectResult<Self> {
        let invalid = || {
            ObjectError::malformed(format!(
                "invalid entry mode {:?}",
                String::from_utf8_lossy(value)
            ))
        };
        let mode = std::str::from_utf8(value).map_err(|_| invalid())?;

        if mode == DIRECTORY_MODE || mode == "040000" {
            return Ok(EntryMode::Directory);
        }

        let permissions = mode.strip_prefix(FILE_MODE_PREFIX).ok_or_else(invalid)?;
        if permissions.len() != 3 || !permissions.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(invalid());
        }

        u32::from_str_radix(permissions, 8)
            .map(EntryMode::File)
            .map_err(|_| invalid())
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = ObjectError;

    fn try_from(value: &str) -> ObjectResult<Self> {
        EntryMode::try_from(value.as_bytes())
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_string())
    }
}
