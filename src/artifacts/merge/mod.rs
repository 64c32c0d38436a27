//! Three-way merge classification
//!
//! This module decides, path by path, what a merge should do: every path
//! known to either tip is compared across the split point, the current tip,
//! and the given tip, and resolved into one of four actions. The rules form
//! an ordered chain; the first matching case wins.
//!
//! 1. The path exists only in the given tip: stage the given version.
//! 2. The split and current versions match and the given tip changed it:
//!    stage the given version.
//! 3. The split and current versions match and the given side deleted the
//!    path after the split: remove it.
//! 4. All three versions differ pairwise (absence counts as a version):
//!    conflict.
//! 5. Anything else: leave the working tree alone.
//!
//! Comparison is by blob object ID, which covers path and content. The
//! deletion lookback in rule 3 walks commit history, so callers pass it in
//! as a closure and it only runs once rules 1 and 2 have failed and the
//! split and current versions are known to match.

pub mod conflict;

use crate::artifacts::objects::object_id::ObjectId;

/// The action a merge takes for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathResolution {
    /// Leave the path as the current tip has it
    Keep,
    /// Check out and stage the given tip's blob
    Stage(ObjectId),
    /// Unstage the path and delete it from the working tree
    Remove,
    /// Write conflict markers from both sides and stage the result
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

impl PathResolution {
    /// Whether applying this resolution rewrites the path in the working tree
    pub fn touches_working_tree(&self) -> bool {
        !matches!(self, PathResolution::Keep)
    }
}

/// Resolve one path against the split, current, and given versions
///
/// `deleted_in_given` reports whether the given tip's history deleted the
/// path somewhere after the split; it is only consulted when the split and
/// current versions are present and equal.
pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    given: Option<&ObjectId>,
    deleted_in_given: impl FnOnce() -> anyhow::Result<bool>,
) -> anyhow::Result<PathResolution> {
    if let Some(given_id) = given {
        if current.is_none() && split.is_none() {
            return Ok(PathResolution::Stage(given_id.clone()));
        }
    }

    if present_eq(split, current) {
        if let Some(given_id) = given {
            if given != split {
                return Ok(PathResolution::Stage(given_id.clone()));
            }
        }

        if deleted_in_given()? {
            return Ok(PathResolution::Remove);
        }
    }

    if current != given && current != split && given != split {
        return Ok(PathResolution::Conflict {
            current: current.cloned(),
            given: given.cloned(),
        });
    }

    Ok(PathResolution::Keep)
}

/// Whether both versions are present and equal; absence never matches
fn present_eq(a: Option<&ObjectId>, b: Option<&ObjectId>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
