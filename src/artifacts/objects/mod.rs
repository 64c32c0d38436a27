//! Object types and operations
//!
//! All repository content is stored as objects identified by SHA-1 hashes.
//! There are two kinds:
//!
//! - **Blob**: one working file (path plus content)
//! - **Commit**: a snapshot of the whole tree with history metadata
//!
//! Both serialize to the format `<kind> <size>\0<content>` and hash over the
//! full serialized form, so a blob's identity covers its path as well as its
//! content.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
