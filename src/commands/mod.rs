//! Command implementations
//!
//! All user-facing commands live under `porcelain` as `impl Repository`
//! blocks; the binary parses the command line and calls straight into them.
//! Repository creation is the exception: it happens before a repository
//! exists, so the binary calls
//! [`Repository::init_at`](crate::areas::repository::Repository::init_at)
//! directly.

pub mod porcelain;
