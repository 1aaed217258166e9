//! Plumbing commands (low-level object operations)
//!
//! ## Commands
//!
//! - `init`: Create the repository metadata directory
//! - `hash-object`: Compute a blob id and optionally store the blob
//! - `cat-file`: Print an object's payload, type or size
//! - `ls-tree`: List the entries of a tree object
//! - `write-tree`: Snapshot the working directory as a tree
//! - `commit-tree`: Record a commit for a tree

pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod init;
pub mod ls_tree;
pub mod write_tree;
