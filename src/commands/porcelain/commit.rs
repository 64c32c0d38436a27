use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::OpError;

impl Repository {
    /// Record one commit from the pending additions and removals.
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        self.create_commit(message, None)?;
        self.save()
    }

    /// Build and store the commit, advance the current branch, and clear the
    /// staging area. `second_parent` is set by merge alone.
    ///
    /// The new snapshot is the head's with the pending removals dropped and
    /// the pending additions layered on top. Staged blobs are promoted into
    /// the object store only when their id differs from what the head already
    /// tracks for the path.
    pub(crate) fn create_commit(
        &mut self,
        message: &str,
        second_parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        if self.state().additions.is_empty() && self.state().removals.is_empty() {
            return Err(OpError::NothingToCommit.into());
        }

        let head_oid = self.head_commit_id()?;
        let head = self.object_store().read_commit(&head_oid)?;

        let mut snapshot = head.snapshot().clone();
        for path in self.state().removals.iter() {
            snapshot.remove(path);
        }

        for (path, blob_id) in self.state().additions.iter() {
            if head.blob_id(path) != Some(blob_id) {
                let blob = self.staging().read_blob(blob_id)?;
                self.object_store().store(&blob)?;
            }
            snapshot.insert(path.clone(), blob_id.clone());
        }

        let mut parents = vec![head_oid];
        parents.extend(second_parent);

        let commit = Commit::new(
            parents,
            chrono::Local::now().fixed_offset(),
            snapshot,
            self.state().removals.clone(),
            message.to_string(),
        );
        let commit_oid = self.object_store().store(&commit)?;

        let current = BranchName::try_parse(self.current_branch().to_string())?;
        self.branches().write_head(&current, &commit_oid)?;

        self.state_mut().additions.clear();
        self.state_mut().removals.clear();
        self.staging().clear()?;

        Ok(commit_oid)
    }
}
