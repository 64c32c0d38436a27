//! Porcelain commands (user-facing version control operations)
//!
//! Each file extends [`Repository`](crate::areas::repository::Repository)
//! with the methods for one command. Commands validate their preconditions
//! against the in-memory state record, mutate the areas they own, and
//! persist the record last, so a failed command leaves the previous state
//! on disk.
//!
//! ## Commands
//!
//! - `add` / `rm`: stage additions and removals
//! - `commit`: turn the staged changes into a new commit
//! - `checkout`: restore files or switch branches
//! - `branch`: create and delete branch pointers
//! - `log` / `find`: walk and search commit history
//! - `status`: report branches, staged work, and the working tree
//! - `reset`: move the current branch to an arbitrary commit
//! - `merge`: three-way merge of another branch into the current one
//! - `remote`: record named remote locations

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod log;
pub mod merge;
pub mod remote;
pub mod reset;
pub mod rm;
pub mod status;
