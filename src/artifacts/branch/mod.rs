//! Branch naming
//!
//! Branch pointers are stored one file per branch, so names double as file
//! names and get validated up front. The rejection rules live in a single
//! regex: leading dot, path separators, and control characters.

pub mod branch_name;

pub const INVALID_BRANCH_NAME_REGEX: &str = r"^\.|[/\\]|[\x00-\x1f\x7f]";
