use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::status::{ChangeKind, StatusReport};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let report = self.build_status_report()?;
        write!(self.writer(), "{report}")?;

        Ok(())
    }

    fn build_status_report(&self) -> anyhow::Result<StatusReport> {
        let head = self.head_commit()?;
        let state = self.state();

        // Every path the engine has a recorded version for: tracked by the
        // head commit or pending addition
        let mut candidates: BTreeSet<PathBuf> = head.snapshot().keys().cloned().collect();
        candidates.extend(state.additions.keys().cloned());

        let mut unstaged = BTreeMap::new();
        for path in candidates {
            if !self.workspace().exists(&path) {
                if !state.removals.contains(&path) {
                    unstaged.insert(path, ChangeKind::Deleted);
                }
                continue;
            }

            let Some(recorded) = state.additions.get(&path).or_else(|| head.blob_id(&path))
            else {
                continue;
            };
            if self.workspace().parse_blob(&path)?.object_id()? != *recorded {
                unstaged.insert(path, ChangeKind::Modified);
            }
        }

        Ok(StatusReport::new(
            state.current_branch.clone(),
            state.branches.clone(),
            state.additions.keys().cloned().collect(),
            state.removals.clone(),
            unstaged,
            self.untracked_files()?.into_iter().collect(),
        ))
    }
}
