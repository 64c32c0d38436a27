use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Check out the commit named by `target` and move the current branch
    /// pointer onto it.
    ///
    /// Commits past the target stay in the object store and keep showing up
    /// in `global-log`, but `log` no longer reaches them.
    pub fn reset(&mut self, target: &str) -> anyhow::Result<()> {
        let target_oid = self.object_store().resolve_commit(target)?;
        self.restore_commit(&target_oid)?;

        let current = BranchName::try_parse(self.current_branch().to_string())?;
        self.branches().write_head(&current, &target_oid)?;
        self.save()
    }
}
