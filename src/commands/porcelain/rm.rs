use crate::areas::repository::Repository;
use crate::errors::OpError;
use std::path::Path;

impl Repository {
    /// Unstage `path` if it is pending addition, and mark it for removal if
    /// the head commit tracks it. Marking for removal also deletes the
    /// working file.
    pub fn rm(&mut self, path: &Path) -> anyhow::Result<()> {
        self.remove_file(path)?;
        self.save()
    }

    pub(crate) fn remove_file(&mut self, path: &Path) -> anyhow::Result<()> {
        let pending = self.state_mut().additions.remove(path);
        let tracked = self.head_commit()?.tracks(path);

        if pending.is_none() && !tracked {
            return Err(OpError::NothingToRemove.into());
        }

        if let Some(stale) = pending {
            self.staging().discard(&stale)?;
        }

        if tracked {
            self.state_mut().removals.insert(path.to_path_buf());
            self.workspace().delete_file(path)?;
        }

        Ok(())
    }
}
