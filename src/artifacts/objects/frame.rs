//! Object framing and identity
//!
//! A frame is the exact byte sequence `<type> <size>\0<payload>` where `size`
//! is the ASCII decimal length of the payload. The object id is the SHA-1
//! digest of the whole frame, header included.

use crate::artifacts::objects::OBJECT_ID_SIZE;
use crate::artifacts::objects::cursor::ByteCursor;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{ObjectError, ObjectResult};
use bytes::{BufMut, Bytes, BytesMut};
use sha1::{Digest, Sha1};

/// Build the canonical frame for a payload. Any byte sequence is a legal payload.
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut frame = BytesMut::with_capacity(header.len() + payload.len());
    frame.put_slice(header.as_bytes());
    frame.put_slice(payload);

    frame.freeze()
}

/// Compute the object id of a complete frame
pub fn identify(frame: &[u8]) -> ObjectId {
    let digest = Sha1::digest(frame);

    let mut raw = [0; OBJECT_ID_SIZE];
    raw.copy_from_slice(&digest);
    ObjectId::from_digest(raw)
}

/// A decoded frame: object type, declared size and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    object_type: ObjectType,
    size: usize,
    payload: Bytes,
}

impl Frame {
    /// Parse raw (decompressed) object bytes
    ///
    /// The header must be `<known-type> <decimal-size>` terminated by the first
    /// NUL byte, and the declared size must equal the payload length.
    pub fn parse(raw: Bytes) -> ObjectResult<Self> {
        let mut cursor = ByteCursor::new(&raw);

        let header = cursor
            .read_until(b'\0')
            .ok_or_else(|| ObjectError::malformed("missing NUL byte after object header"))?;
        let payload_start = cursor.position();

        let mut header = ByteCursor::new(header);
        let type_token = header
            .read_until(b' ')
            .ok_or_else(|| ObjectError::malformed("missing space in object header"))?;
        let object_type = ObjectType::try_from(type_token)?;
        let size = Self::parse_size(header.remaining())?;

        let payload = raw.slice(payload_start..);
        if payload.len() != size {
            return Err(ObjectError::malformed(format!(
                "{object_type} header declares {size} bytes but payload has {}",
                payload.len()
            )));
        }

        Ok(Frame {
            object_type,
            size,
            payload,
        })
    }

    fn parse_size(token: &[u8]) -> ObjectResult<usize> {
        // `usize::from_str` would also accept a leading '+'
        if token.is_empty() || !token.iter().all(u8::is_ascii_digit) {
            return Err(ObjectError::malformed(format!(
                "invalid object size {:?}",
                String::from_utf8_lossy(token)
            )));
        }

        std::str::from_utf8(token)
            .ok()
            .and_then(|size| size.parse().ok())
            .ok_or_else(|| {
                ObjectError::malformed(format!(
                    "object size out of range: {}",
                    String::from_utf8_lossy(token)
                ))
            })
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}
