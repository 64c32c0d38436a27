//! A small single-user version control engine
//!
//! twig tracks the history of one local directory: files are staged, turned
//! into immutable commits, organized into branches, and merged back
//! together. There is no network layer and no index of file metadata; every
//! command reads the working tree and the object store directly.
//!
//! ## Architecture
//!
//! The crate is split into three layers:
//!
//! - [`artifacts`]: the value types of the engine. Content-addressed objects
//!   (blobs and commits), the persistent state record, branch names, history
//!   walks, and merge resolution live here and know nothing about the disk
//!   layout.
//! - [`areas`]: the on-disk places those values live in. The object store,
//!   the staging area, the branch pointer directory, and the working tree
//!   each get a type, tied together by [`areas::repository::Repository`].
//! - [`commands`]: the porcelain operations, written as `impl Repository`
//!   blocks. One file per command.
//!
//! [`errors`] carries the user-facing failure taxonomy shared by all three.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
