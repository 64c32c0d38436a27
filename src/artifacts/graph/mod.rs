//! Commit graph traversals
//!
//! History walks for the merge machinery: ancestry tests, first-parent
//! distances, split-point search, and deletion lookback. All walks follow
//! **first parents only**; second parents take part solely through the split
//! search's own case analysis. Every traversal is a loop or an explicit
//! stack, never recursion, so arbitrarily deep histories cannot overflow.
//!
//! The walker is generic over a commit loader, so the algorithms can be
//! exercised against an in-memory store in tests and against the object
//! store in production.
//!
//! ## Debug Logging
//!
//! Split-search steps are traced when the `debug_merge` feature flag is
//! enabled (`cargo build --features debug_merge`).

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use std::path::Path;

/// Macro for debug logging that is enabled with the debug_merge feature flag
///
/// # Usage
/// ```rust,ignore
/// debug_log!("Processing commit {}", commit_id);
/// ```
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(any(feature = "debug_merge"))]
        {
            eprintln!($($arg)*);
        }
    };
}

/// One frame of the iterative split search
///
/// `Enter` asks for the split of a commit; `Combine` pops the splits of both
/// parents of a two-parent commit and keeps whichever sits closer to the
/// reference tip.
enum SplitFrame {
    Enter(ObjectId),
    Combine,
}

/// Walks commit history through a pluggable loader
///
/// # Type Parameters
///
/// * `CommitLoaderFn` - Function that takes a commit ObjectId and returns its
///   slim form (parents and deleted paths). Root commits come back with an
///   empty parents vector.
pub struct HistoryWalker<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    /// Function to load commit data for any given commit ID
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> HistoryWalker<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Whether `candidate` appears on `of`'s first-parent chain
    ///
    /// A commit counts as its own ancestor. Second parents are ignored, so a
    /// merged-in branch tip is *not* an ancestor of the merge commit by this
    /// definition.
    pub fn is_ancestor(&self, candidate: &ObjectId, of: &ObjectId) -> anyhow::Result<bool> {
        let mut cursor = of.clone();

        loop {
            if &cursor == candidate {
                return Ok(true);
            }
            match (self.commit_loader)(&cursor)?.parent() {
                Some(parent) => cursor = parent.clone(),
                None => return Ok(false),
            }
        }
    }

    /// Number of first-parent hops from `from` down to `to`
    ///
    /// Returns zero for the commit itself and `None` when `to` never shows up
    /// on the chain; callers treat that as infinitely far.
    pub fn distance_to(&self, from: &ObjectId, to: &ObjectId) -> anyhow::Result<Option<usize>> {
        let mut cursor = from.clone();
        let mut hops = 0;

        loop {
            if &cursor == to {
                return Ok(Some(hops));
            }
            match (self.commit_loader)(&cursor)?.parent() {
                Some(parent) => {
                    cursor = parent.clone();
                    hops += 1;
                }
                None => return Ok(None),
            }
        }
    }

    /// Find the split point of `c0` and `c1`: the merge base used by the
    /// three-way classification
    ///
    /// The case order is load-bearing:
    /// 1. a rootless `c0` is its own split;
    /// 2. `c0`'s first parent, if it is an ancestor of `c1`;
    /// 3. `c0`'s second parent, if it is an ancestor of `c1`;
    /// 4. otherwise descend into the parent(s); with two parents, keep
    ///    whichever recursive split lies closer to `c1`, ties and
    ///    unreachable distances favoring the second-parent split.
    ///
    /// The descent runs on an explicit stack with a post-order combine step.
    pub fn find_split(&self, c0: &ObjectId, c1: &ObjectId) -> anyhow::Result<ObjectId> {
        let mut frames = vec![SplitFrame::Enter(c0.clone())];
        let mut splits: Vec<ObjectId> = Vec::new();

        while let Some(frame) = frames.pop() {
            match frame {
                SplitFrame::Enter(oid) => {
                    let commit = (self.commit_loader)(&oid)?;

                    let Some(parent) = commit.parent() else {
                        debug_log!("split: {} is a root, split is itself", &oid);
                        splits.push(oid);
                        continue;
                    };

                    if self.is_ancestor(parent, c1)? {
                        debug_log!("split: first parent {} reaches {}", parent, c1);
                        splits.push(parent.clone());
                        continue;
                    }

                    match commit.second_parent() {
                        Some(second) if self.is_ancestor(second, c1)? => {
                            debug_log!("split: second parent {} reaches {}", second, c1);
                            splits.push(second.clone());
                        }
                        Some(second) => {
                            debug_log!("split: descending both parents of {}", &oid);
                            frames.push(SplitFrame::Combine);
                            frames.push(SplitFrame::Enter(second.clone()));
                            frames.push(SplitFrame::Enter(parent.clone()));
                        }
                        None => {
                            frames.push(SplitFrame::Enter(parent.clone()));
                        }
                    }
                }
                SplitFrame::Combine => {
                    let second_split = splits.pop().ok_or_else(missing_split)?;
                    let first_split = splits.pop().ok_or_else(missing_split)?;
                    let closer = self.closer_to(c1, first_split, second_split)?;

                    debug_log!("split: combined to {}", &closer);
                    splits.push(closer);
                }
            }
        }

        splits.pop().ok_or_else(missing_split)
    }

    /// Whether `path` was deleted somewhere on `from`'s first-parent chain
    /// after `split`
    ///
    /// Checks `from` itself but not `split`. The walk ends at the root even
    /// if `split` never shows up on the chain.
    pub fn deleted_since(
        &self,
        from: &ObjectId,
        split: &ObjectId,
        path: &Path,
    ) -> anyhow::Result<bool> {
        let mut cursor = from.clone();

        loop {
            if &cursor == split {
                return Ok(false);
            }
            let commit = (self.commit_loader)(&cursor)?;
            if commit.deleted.contains(path) {
                return Ok(true);
            }
            match commit.parent() {
                Some(parent) => cursor = parent.clone(),
                None => return Ok(false),
            }
        }
    }

    /// Pick whichever of the two candidates sits closer to `ref_tip` on its
    /// first-parent chain; strictly closer wins, everything else picks the
    /// second candidate
    fn closer_to(
        &self,
        ref_tip: &ObjectId,
        first: ObjectId,
        second: ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let first_distance = self.distance_to(ref_tip, &first)?;
        let second_distance = self.distance_to(ref_tip, &second)?;

        let closer = match (first_distance, second_distance) {
            (Some(to_first), Some(to_second)) if to_first < to_second => first,
            (Some(_), None) => first,
            _ => second,
        };

        Ok(closer)
    }
}

fn missing_split() -> anyhow::Error {
    anyhow::anyhow!("Split search produced no candidate")
}
