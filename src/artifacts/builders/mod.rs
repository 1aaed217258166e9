//! Object graph builders
//!
//! - `tree_builder`: Snapshot a directory hierarchy into blob and tree objects
//! - `commit_builder`: Record a tree, an optional parent and a message as a commit

pub mod commit_builder;
pub mod tree_builder;
