//! Storage areas of a repository
//!
//! - `database`: Object store trait and the on-disk object database
//! - `memory`: In-memory object store and workspace
//! - `repository`: Repository handle tying the areas together
//! - `workspace`: Directory listing trait and the working directory

pub mod database;
pub mod memory;
pub mod repository;
pub mod workspace;
