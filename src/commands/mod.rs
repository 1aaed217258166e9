//! Command implementations
//!
//! Plumbing commands give direct access to the object database: bootstrap a
//! repository, hash and print objects, snapshot the working directory into a
//! tree and record commits.

pub mod plumbing;
