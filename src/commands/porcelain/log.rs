use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Print the history of the current head, following first parents only
    /// down to the root commit.
    pub fn log(&self) -> anyhow::Result<()> {
        let mut cursor = Some(self.head_commit_id()?);

        while let Some(commit_oid) = cursor {
            let commit = self.object_store().read_commit(&commit_oid)?;
            self.print_commit(&commit_oid, &commit)?;
            cursor = commit.parent().cloned();
        }

        Ok(())
    }

    /// Print every commit in the object store, reachable or not, in store
    /// order.
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_oid in self.object_store().list_commits()? {
            let commit = self.object_store().read_commit(&commit_oid)?;
            self.print_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }

    fn print_commit(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(self.writer(), "commit {}", commit_oid.as_ref())?;

        if let (Some(first), Some(second)) = (commit.parent(), commit.second_parent()) {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }

        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
