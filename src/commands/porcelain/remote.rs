use crate::areas::repository::Repository;
use crate::errors::OpError;
use std::path::PathBuf;

impl Repository {
    /// Record `path` as the location of remote `name`. Remotes are
    /// bookkeeping only; nothing is ever fetched from or pushed to them.
    pub fn add_remote(&mut self, name: &str, path: &str) -> anyhow::Result<()> {
        if self.state().remotes.contains_key(name) {
            return Err(OpError::RemoteExists.into());
        }

        self.state_mut()
            .remotes
            .insert(name.to_string(), PathBuf::from(path));
        self.save()
    }

    /// Forget remote `name`.
    pub fn rm_remote(&mut self, name: &str) -> anyhow::Result<()> {
        if self.state_mut().remotes.remove(name).is_none() {
            return Err(OpError::UnknownRemote.into());
        }

        self.save()
    }
}
