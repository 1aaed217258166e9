use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::frame::{Frame, frame, identify};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::ObjectResult;
use bytes::Bytes;

/// Encodes an object's payload (the frame body, without header)
pub trait Packable {
    fn payload(&self) -> Bytes;
}

/// Decodes an object from its payload; the header has already been consumed
pub trait Unpackable {
    fn deserialize(payload: Bytes) -> ObjectResult<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// Full frame, `<type> <size>\0<payload>`
    fn serialize(&self) -> Bytes {
        frame(self.object_type(), &self.payload())
    }

    fn object_id(&self) -> ObjectId {
        identify(&self.serialize())
    }
}

#[derive(Debug, Clone)]
pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn from_frame(frame: Frame) -> ObjectResult<Self> {
        let object_type = frame.object_type();
        let payload = frame.into_payload();

        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(payload)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(payload)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(payload)?)),
        })
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(blob) => blob.object_type(),
            ObjectBox::Tree(tree) => tree.object_type(),
            ObjectBox::Commit(commit) => commit.object_type(),
        }
    }

    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}
