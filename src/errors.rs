//! User-facing failure taxonomy
//!
//! Every failure a command reports to the user is one [`OpError`] variant;
//! the `Display` text is the exact message printed. Operations return
//! `anyhow::Result`, so these travel inside `anyhow::Error` and the binary
//! downcasts at the top to pick the message target and exit code. Anything
//! that is not an `OpError` is an internal error and goes to stderr with its
//! context chain.

use thiserror::Error;

/// Failure classes, used by the binary to pick an exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The named commit, branch, file, or remote does not exist
    NotFound,
    /// The repository state forbids the operation
    Precondition,
    /// The operation would clobber an untracked working file
    WorkingTreeConflict,
}

/// Every user-facing failure, one variant per condition
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("File does not exist.")]
    StageMissingFile,
    #[error("No reason to remove the file.")]
    NothingToRemove,
    #[error("No changes added to the commit.")]
    NothingToCommit,
    #[error("Please enter a commit message.")]
    EmptyCommitMessage,
    #[error("No commit with that id exists.")]
    UnknownCommit,
    #[error("File does not exist in that commit.")]
    PathAbsentInCommit,
    #[error("No such branch exists.")]
    UnknownBranchCheckout,
    #[error("A branch with that name does not exist.")]
    UnknownBranch,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,
    #[error("A branch with that name already exists.")]
    BranchExists,
    #[error("Incorrect branch name.")]
    InvalidBranchName,
    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,
    #[error("You have uncommitted changes.")]
    DirtyStaging,
    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,
    #[error("Given branch is an ancestor of the current branch.")]
    AlreadyMerged,
    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedInTheWay,
    #[error("A remote with that name already exists.")]
    RemoteExists,
    #[error("A remote with that name does not exist.")]
    UnknownRemote,
    #[error("Found no commit with that message.")]
    NoMatchingCommit,
    #[error("Not in an initialized twig directory.")]
    RepositoryNotFound,
    #[error("A twig version-control system already exists in the current directory.")]
    RepositoryExists,
}

impl OpError {
    pub fn class(&self) -> ErrorClass {
        match self {
            OpError::UnknownCommit
            | OpError::PathAbsentInCommit
            | OpError::UnknownBranchCheckout
            | OpError::UnknownBranch
            | OpError::UnknownRemote
            | OpError::NoMatchingCommit
            | OpError::StageMissingFile => ErrorClass::NotFound,
            OpError::UntrackedInTheWay => ErrorClass::WorkingTreeConflict,
            OpError::NothingToRemove
            | OpError::NothingToCommit
            | OpError::EmptyCommitMessage
            | OpError::AlreadyOnBranch
            | OpError::BranchExists
            | OpError::InvalidBranchName
            | OpError::RemoveCurrentBranch
            | OpError::DirtyStaging
            | OpError::MergeWithSelf
            | OpError::AlreadyMerged
            | OpError::RemoteExists
            | OpError::RepositoryNotFound
            | OpError::RepositoryExists => ErrorClass::Precondition,
        }
    }
}
