use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::OpError;

impl Repository {
    /// Create branch `name` pointing at the current head commit. The new
    /// branch is not checked out.
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        if self.state().branches.contains(name) {
            return Err(OpError::BranchExists.into());
        }

        let branch = BranchName::try_parse(name)?;
        let head_oid = self.head_commit_id()?;
        self.branches().write_head(&branch, &head_oid)?;

        self.state_mut().branches.insert(name.to_string());
        self.save()
    }

    /// Delete the pointer for branch `name`. Commits reachable from it stay
    /// in the object store.
    pub fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.state().branches.contains(name) {
            return Err(OpError::UnknownBranch.into());
        }
        if name == self.current_branch() {
            return Err(OpError::RemoveCurrentBranch.into());
        }

        let branch = BranchName::try_parse(name)?;
        self.branches().delete(&branch)?;

        self.state_mut().branches.remove(name);
        self.save()
    }
}
