//! Folding another branch's changes into the current one.
//!
//! Work happens in two phases. A read-only planning pass finds the split
//! point and classifies every path either tip tracks; only once the whole
//! plan is known does the apply pass touch the staging area and the working
//! tree. Conflicted paths are rewritten with both versions between markers,
//! staged, and committed like any other change; the conflict is reported
//! after the merge commit exists.

use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::graph::HistoryWalker;
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::merge::{PathResolution, classify};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::OpError;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

/// What the planning pass decided to do with the given branch
enum MergeCourse {
    /// The current head is an ancestor of the given tip; just move up to it
    FastForward,
    /// A true three-way merge with one resolution per affected path
    Resolve(Vec<(PathBuf, PathResolution)>),
}

impl Repository {
    pub fn merge(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.state().additions.is_empty() || !self.state().removals.is_empty() {
            return Err(OpError::DirtyStaging.into());
        }
        if !self.state().branches.contains(name) {
            return Err(OpError::UnknownBranch.into());
        }
        if name == self.current_branch() {
            return Err(OpError::MergeWithSelf.into());
        }

        let branch = BranchName::try_parse(name)?;
        let head_oid = self.head_commit_id()?;
        let given_oid = self.branches().read_head(&branch)?;

        match self.plan_merge(&head_oid, &given_oid)? {
            MergeCourse::FastForward => self.fast_forward(&given_oid),
            MergeCourse::Resolve(resolutions) => self.resolve_merge(name, &given_oid, resolutions),
        }
    }

    /// Classify every path tracked by either tip without touching anything.
    fn plan_merge(&self, head_oid: &ObjectId, given_oid: &ObjectId) -> anyhow::Result<MergeCourse> {
        let store = self.object_store();
        let walker = HistoryWalker::new(|oid: &ObjectId| store.load_slim_commit(oid));

        if walker.is_ancestor(given_oid, head_oid)? {
            return Err(OpError::AlreadyMerged.into());
        }
        if walker.is_ancestor(head_oid, given_oid)? {
            return Ok(MergeCourse::FastForward);
        }

        let split_oid = walker.find_split(head_oid, given_oid)?;
        let split = store.read_commit(&split_oid)?;
        let head = store.read_commit(head_oid)?;
        let given = store.read_commit(given_oid)?;

        let mut paths: BTreeSet<PathBuf> = head.snapshot().keys().cloned().collect();
        paths.extend(given.snapshot().keys().cloned());

        let mut resolutions = Vec::new();
        for path in paths {
            let resolution = classify(
                split.blob_id(&path),
                head.blob_id(&path),
                given.blob_id(&path),
                || walker.deleted_since(given_oid, &split_oid, &path),
            )?;
            resolutions.push((path, resolution));
        }

        Ok(MergeCourse::Resolve(resolutions))
    }

    /// The given branch is strictly ahead: restore its tree and advance the
    /// current branch pointer onto its tip. No merge commit is made.
    fn fast_forward(&mut self, given_oid: &ObjectId) -> anyhow::Result<()> {
        self.restore_commit(given_oid)?;

        let current = BranchName::try_parse(self.current_branch().to_string())?;
        self.branches().write_head(&current, given_oid)?;
        self.save()?;

        writeln!(self.writer(), "Current branch fast-forwarded.")?;

        Ok(())
    }

    fn resolve_merge(
        &mut self,
        name: &str,
        given_oid: &ObjectId,
        resolutions: Vec<(PathBuf, PathResolution)>,
    ) -> anyhow::Result<()> {
        // An untracked file where a resolution would write means losing local
        // work; refuse before mutating anything
        let untracked: BTreeSet<PathBuf> = self.untracked_files()?.into_iter().collect();
        for (path, resolution) in resolutions.iter() {
            let overwrites = matches!(
                resolution,
                PathResolution::Stage(_) | PathResolution::Remove
            );
            if overwrites && untracked.contains(path) {
                return Err(OpError::UntrackedInTheWay.into());
            }
        }

        let mut conflicted = false;
        for (path, resolution) in resolutions.iter() {
            match resolution {
                PathResolution::Keep => {}
                PathResolution::Stage(blob_id) => {
                    let blob = self.object_store().read_blob(blob_id)?;
                    self.workspace().write_file(path, blob.content())?;
                    self.stage_file(path)?;
                }
                PathResolution::Remove => {
                    self.remove_file(path)?;
                }
                PathResolution::Conflict { current, given } => {
                    conflicted = true;
                    let current = self.read_optional_content(current.as_ref())?;
                    let given = self.read_optional_content(given.as_ref())?;
                    let merged = conflict_content(current.as_deref(), given.as_deref());
                    self.workspace().write_file(path, &merged)?;
                    self.stage_file(path)?;
                }
            }
        }

        let message = format!("Merged {} into {}.", name, self.current_branch());
        if !self.state().additions.is_empty() || !self.state().removals.is_empty() {
            self.create_commit(&message, Some(given_oid.clone()))?;
        }
        self.save()?;

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(())
    }

    fn read_optional_content(&self, blob_id: Option<&ObjectId>) -> anyhow::Result<Option<String>> {
        blob_id
            .map(|id| self.object_store().read_blob(id))
            .transpose()
            .map(|blob| blob.map(|blob| blob.into_content()))
    }
}
