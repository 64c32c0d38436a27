//! Version-control data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: Branch name validation
//! - `core`: Shared utilities (pager wrapper, etc.)
//! - `graph`: Commit history traversals for the merge machinery
//! - `merge`: Three-way merge classification and conflict rendering
//! - `objects`: Object types (blob, commit) and their serialized forms
//! - `state`: The on-disk repository-state record
//! - `status`: Working tree status report

pub mod branch;
pub mod core;
pub mod graph;
pub mod merge;
pub mod objects;
pub mod state;
pub mod status;
