use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::OpError;
use std::path::Path;

impl Repository {
    /// Stage `path` as it currently reads in the working tree.
    ///
    /// Re-adding a file replaces its previously staged version, and staging
    /// content identical to what the head commit tracks clears any pending
    /// record for the path instead of storing a copy.
    pub fn add(&mut self, path: &Path) -> anyhow::Result<()> {
        if !self.workspace().exists(path) {
            return Err(OpError::StageMissingFile.into());
        }

        self.stage_file(path)?;
        self.save()
    }

    /// Stage without persisting the state record; merge batches several of
    /// these before a single save.
    pub(crate) fn stage_file(&mut self, path: &Path) -> anyhow::Result<()> {
        if let Some(stale) = self.state_mut().additions.remove(path) {
            self.staging().discard(&stale)?;
        }
        self.state_mut().removals.remove(path);

        let blob = self.workspace().parse_blob(path)?;
        if self.head_commit()?.blob_id(path) == Some(&blob.object_id()?) {
            return Ok(());
        }

        let blob_id = self.staging().write_blob(&blob)?;
        self.state_mut().additions.insert(path.to_path_buf(), blob_id);

        Ok(())
    }
}
