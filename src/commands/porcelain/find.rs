use crate::areas::repository::Repository;
use crate::errors::OpError;
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message matches `message` exactly,
    /// one per line.
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let mut found = false;

        for commit_oid in self.object_store().list_commits()? {
            let commit = self.object_store().read_commit(&commit_oid)?;
            if commit.message() == message {
                writeln!(self.writer(), "{}", commit_oid.as_ref())?;
                found = true;
            }
        }

        if !found {
            return Err(OpError::NoMatchingCommit.into());
        }

        Ok(())
    }
}
