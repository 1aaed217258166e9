//! Object database
//!
//! Objects are stored zlib-compressed under `objects/<xx>/<38 hex chars>`,
//! keyed by the SHA-1 of their frame. An object is written at most once:
//! storing a frame whose path already exists is a successful no-op.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::frame::{Frame, identify};
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{ObjectError, ObjectResult};
use bytes::Bytes;
use fake::rand;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Content-addressed object storage
///
/// Implementations only have to persist and retrieve raw frames; decoding is
/// layered on top by the provided methods.
pub trait ObjectStore {
    /// Persist a frame and return its id, whether or not it was already stored
    fn put(&self, frame: &[u8]) -> ObjectResult<ObjectId>;

    /// Retrieve the raw (decompressed) frame stored under `oid`
    fn get(&self, oid: &ObjectId) -> ObjectResult<Bytes>;

    fn exists(&self, oid: &ObjectId) -> bool;

    fn store<O: Object>(&self, object: &O) -> ObjectResult<ObjectId>
    where
        Self: Sized,
    {
        self.put(&object.serialize())
    }

    fn read_frame(&self, oid: &ObjectId) -> ObjectResult<Frame> {
        Frame::parse(self.get(oid)?)
    }

    fn read_header(&self, oid: &ObjectId) -> ObjectResult<(ObjectType, usize)> {
        let frame = self.read_frame(oid)?;
        Ok((frame.object_type(), frame.size()))
    }

    fn read_payload(&self, oid: &ObjectId) -> ObjectResult<Bytes> {
        Ok(self.read_frame(oid)?.into_payload())
    }

    fn parse_object(&self, oid: &ObjectId) -> ObjectResult<ObjectBox> {
        ObjectBox::from_frame(self.read_frame(oid)?)
    }

    fn parse_object_as_blob(&self, oid: &ObjectId) -> ObjectResult<Option<Blob>> {
        let frame = self.read_frame(oid)?;

        match frame.object_type() {
            ObjectType::Blob => Ok(Some(Blob::deserialize(frame.into_payload())?)),
            _ => Ok(None),
        }
    }

    fn parse_object_as_tree(&self, oid: &ObjectId) -> ObjectResult<Option<Tree>> {
        let frame = self.read_frame(oid)?;

        match frame.object_type() {
            ObjectType::Tree => Ok(Some(Tree::deserialize(frame.into_payload())?)),
            _ => Ok(None),
        }
    }

    fn parse_object_as_commit(&self, oid: &ObjectId) -> ObjectResult<Option<Commit>> {
        let frame = self.read_frame(oid)?;

        match frame.object_type() {
            ObjectType::Commit => Ok(Some(Commit::deserialize(frame.into_payload())?)),
            _ => Ok(None),
        }
    }
}

/// On-disk object database rooted at an `objects` directory
///
/// The directory itself is created by repository bootstrap; only the fan-out
/// subdirectories are created here.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.to_path())
    }

    // The frame is compressed into a uniquely named temp file next to its final
    // location and renamed into place, so readers never observe a partial object.
    fn write_object(&self, object_path: &Path, frame: &[u8]) -> ObjectResult<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| ObjectError::malformed("object path without parent directory"))?;
        // only the fan-out directory is created; a missing objects root is an error
        match std::fs::create_dir(object_dir) {
            Err(e) if e.kind() != std::io::ErrorKind::AlreadyExists => {
                return Err(ObjectError::io(object_dir)(e));
            }
            _ => {}
        }

        let temp_path = object_dir.join(Self::generate_temp_name());
        let result = Self::write_compressed(&temp_path, frame).and_then(|()| {
            std::fs::rename(&temp_path, object_path).map_err(ObjectError::io(object_path))
        });

        if result.is_err() {
            let _ = std::fs::remove_file(&temp_path);
            // a concurrent writer may have renamed the same object into place first
            if object_path.exists() {
                debug!(path = %object_path.display(), "object stored concurrently");
                return Ok(());
            }
        }

        result
    }

    fn write_compressed(temp_path: &Path, frame: &[u8]) -> ObjectResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)
            .map_err(ObjectError::io(temp_path))?;

        let mut encoder = flate2::write::ZlibEncoder::new(file, flate2::Compression::default());
        encoder.write_all(frame).map_err(ObjectError::io(temp_path))?;
        let file = encoder.finish().map_err(ObjectError::io(temp_path))?;
        file.sync_all().map_err(ObjectError::io(temp_path))?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

impl ObjectStore for Database {
    fn put(&self, frame: &[u8]) -> ObjectResult<ObjectId> {
        let oid = identify(frame);
        let object_path = self.object_path(&oid);

        if self.exists(&oid) {
            debug!(%oid, "object already stored");
            return Ok(oid);
        }

        self.write_object(&object_path, frame)?;
        debug!(%oid, bytes = frame.len(), "stored object");

        Ok(oid)
    }

    fn get(&self, oid: &ObjectId) -> ObjectResult<Bytes> {
        let object_path = self.object_path(oid);

        let file = File::open(&object_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ObjectError::NotFound(*oid),
            _ => ObjectError::io(&object_path)(e),
        })?;

        let mut decoder = flate2::read::ZlibDecoder::new(BufReader::new(file));
        let mut frame = Vec::new();
        decoder
            .read_to_end(&mut frame)
            .map_err(|source| ObjectError::CorruptObject { oid: *oid, source })?;

        Ok(frame.into())
    }

    fn exists(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).exists()
    }
}
