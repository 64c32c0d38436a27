use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::OpError;
use std::path::Path;

impl Repository {
    /// Overwrite `path` in the working tree with the head commit's version.
    pub fn checkout_file(&self, path: &Path) -> anyhow::Result<()> {
        let head = self.head_commit()?;
        self.restore_file(&head, path)
    }

    /// Overwrite `path` with its version from the commit named by `target`,
    /// which may be a unique id prefix.
    pub fn checkout_file_at(&self, target: &str, path: &Path) -> anyhow::Result<()> {
        let commit_oid = self.object_store().resolve_commit(target)?;
        let commit = self.object_store().read_commit(&commit_oid)?;
        self.restore_file(&commit, path)
    }

    /// Switch to branch `name`: restore its whole snapshot and make it the
    /// current branch.
    pub fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.state().branches.contains(name) {
            return Err(OpError::UnknownBranchCheckout.into());
        }
        if name == self.current_branch() {
            return Err(OpError::AlreadyOnBranch.into());
        }

        let branch = BranchName::try_parse(name)?;
        let target_oid = self.branches().read_head(&branch)?;
        self.restore_commit(&target_oid)?;

        self.state_mut().current_branch = name.to_string();
        self.save()
    }

    fn restore_file(&self, commit: &Commit, path: &Path) -> anyhow::Result<()> {
        let blob_id = commit.blob_id(path).ok_or(OpError::PathAbsentInCommit)?;
        let blob = self.object_store().read_blob(blob_id)?;
        self.workspace().write_file(path, blob.content())
    }

    /// Reset the working tree to `target_oid`'s snapshot and drop all staged
    /// work.
    ///
    /// Refuses to run while an untracked file sits where the target snapshot
    /// would write, so local work is never silently overwritten. Files the
    /// current head tracks but the target does not are deleted.
    pub(crate) fn restore_commit(&mut self, target_oid: &ObjectId) -> anyhow::Result<()> {
        let target = self.object_store().read_commit(target_oid)?;
        let head = self.head_commit()?;

        for path in self.untracked_files()? {
            if target.tracks(&path) {
                return Err(OpError::UntrackedInTheWay.into());
            }
        }

        for (path, blob_id) in target.snapshot() {
            let blob = self.object_store().read_blob(blob_id)?;
            self.workspace().write_file(path, blob.content())?;
        }

        for path in head.snapshot().keys() {
            if !target.tracks(path) {
                self.workspace().delete_file(path)?;
            }
        }

        self.staging().clear()?;
        self.state_mut().additions.clear();
        self.state_mut().removals.clear();

        Ok(())
    }
}
