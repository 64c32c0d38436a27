//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `branches`: Branch pointer files
//! - `object_store`: Content-addressed storage for blobs and commits
//! - `repository`: High-level repository operations and coordination
//! - `staging`: Staged blob bytes awaiting the next commit
//! - `workspace`: Working directory file system operations

pub(crate) mod branches;
pub(crate) mod object_store;
pub mod repository;
pub(crate) mod staging;
pub(crate) mod workspace;
