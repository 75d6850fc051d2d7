//! On-disk areas of a repository
//!
//! - `database`: the content-addressable object store
//! - `refs`: symbolic and direct references
//! - `repository`: wiring of the areas plus revision resolution
//! - `workspace`: materialization of trees into a working directory

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
