//! Object model and algorithms
//!
//! - `objects`: Object types (blob, tree, commit), ids and the frame codec
//! - `builders`: Tree and commit construction on top of an object store

pub mod builders;
pub mod objects;
