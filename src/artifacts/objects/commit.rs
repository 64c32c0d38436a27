//! Commit object
//!
//! Commits are whole-tree snapshots with history metadata:
//! - Up to two parent commit IDs (second parent only on merge commits)
//! - A timestamp with its UTC offset
//! - The snapshot map from working path to blob ID
//! - The set of paths deleted relative to the first parent
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! timestamp <seconds> <offset>
//! blob <blob-sha> <path>
//! deleted <path>
//!
//! <commit message>
//! ```
//!
//! The snapshot and deleted sections are written in lexicographic path order,
//! so the same logical commit always serializes to the same bytes and hashes
//! to the same ID.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Message carried by the root commit of every repository
pub const ROOT_MESSAGE: &str = "initial commit";

/// Commit object
///
/// Immutable once created; every mutation of history is a new commit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit IDs (empty for the root, two for merge commits)
    parents: Vec<ObjectId>,
    /// Creation time with the creator's UTC offset
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    /// Tracked files: working path mapped to blob ID
    snapshot: BTreeMap<PathBuf, ObjectId>,
    /// Paths removed relative to the first parent
    deleted: BTreeSet<PathBuf>,
    /// Commit message
    message: String,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
        snapshot: BTreeMap<PathBuf, ObjectId>,
        deleted: BTreeSet<PathBuf>,
        message: String,
    ) -> Self {
        Commit {
            parents,
            timestamp,
            snapshot,
            deleted,
            message,
        }
    }

    /// The root commit every repository history starts from: no parents, an
    /// empty snapshot, and a fixed timestamp of zero seconds since the epoch
    pub fn root() -> Self {
        let epoch = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset();
        Commit::new(
            Vec::new(),
            epoch,
            BTreeMap::new(),
            BTreeSet::new(),
            ROOT_MESSAGE.to_string(),
        )
    }

    /// Get the full commit message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }

    /// Format the timestamp in log form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 01 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format("%a %b %d %H:%M:%S %Y %z").to_string()
    }

    /// Get the tracked files as a path-to-blob-ID map
    pub fn snapshot(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.snapshot
    }

    /// Look up the blob ID tracked for a path, if any
    pub fn blob_id(&self, path: &Path) -> Option<&ObjectId> {
        self.snapshot.get(path)
    }

    pub fn tracks(&self, path: &Path) -> bool {
        self.snapshot.contains_key(path)
    }

    /// Paths this commit removed relative to its first parent
    pub fn deleted(&self) -> &BTreeSet<PathBuf> {
        &self.deleted
    }

    /// Reduce to the slim form used by graph walks
    pub fn slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            deleted: self.deleted.clone(),
        }
    }
}

/// Parse a `%z`-style UTC offset such as `+0000` or `-0730`
fn parse_offset(offset: &str) -> anyhow::Result<chrono::FixedOffset> {
    anyhow::ensure!(offset.len() == 5, "Invalid UTC offset: {offset}");

    let (sign, digits) = offset.split_at(1);
    let hours: i32 = digits[..2].parse().context("Invalid UTC offset hours")?;
    let minutes: i32 = digits[2..].parse().context("Invalid UTC offset minutes")?;
    let seconds = (hours * 60 + minutes) * 60;

    match sign {
        "+" => chrono::FixedOffset::east_opt(seconds),
        "-" => chrono::FixedOffset::west_opt(seconds),
        _ => None,
    }
    .with_context(|| format!("Invalid UTC offset: {offset}"))
}

/// Parse a `timestamp <seconds> <offset>` payload back into an instant that
/// remembers the offset it was recorded with
fn parse_timestamp(payload: &str) -> anyhow::Result<chrono::DateTime<chrono::FixedOffset>> {
    let (seconds, offset) = payload
        .split_once(' ')
        .context("Invalid commit object: malformed timestamp line")?;
    let seconds: i64 = seconds.parse().context("Invalid commit timestamp")?;
    let offset = parse_offset(offset)?;

    let instant = chrono::DateTime::from_timestamp(seconds, 0)
        .context("Commit timestamp out of range")?;
    Ok(instant.with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        for parent in &self.parents {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.snapshot {
            object_content.push(format!("blob {} {}", oid.as_ref(), path.display()));
        }
        for path in &self.deleted {
            object_content.push(format!("deleted {}", path.display()));
        }
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");

        let mut content_bytes = Vec::new();
        content_bytes.write_all(object_content.as_bytes())?;

        let mut commit_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines().peekable();

        let mut parents = Vec::new();
        while let Some(parent) = lines.peek().and_then(|line| line.strip_prefix("parent ")) {
            parents.push(ObjectId::try_parse(parent.to_string())?);
            lines.next();
        }

        let timestamp_line = lines
            .next()
            .context("Invalid commit object: missing timestamp line")?;
        let timestamp = parse_timestamp(
            timestamp_line
                .strip_prefix("timestamp ")
                .context("Invalid commit object: invalid timestamp line")?,
        )?;

        let mut snapshot = BTreeMap::new();
        while let Some(entry) = lines.peek().and_then(|line| line.strip_prefix("blob ")) {
            let (oid, path) = entry
                .split_once(' ')
                .context("Invalid commit object: malformed blob line")?;
            snapshot.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
            lines.next();
        }

        let mut deleted = BTreeSet::new();
        while let Some(path) = lines.peek().and_then(|line| line.strip_prefix("deleted ")) {
            deleted.insert(PathBuf::from(path));
            lines.next();
        }

        // skip the empty line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new(parents, timestamp, snapshot, deleted, message))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("timestamp {}", self.readable_timestamp()));
        for (path, oid) in &self.snapshot {
            lines.push(format!("blob {} {}", oid.as_ref(), path.display()));
        }
        for path in &self.deleted {
            lines.push(format!("deleted {}", path.display()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

/// Slim representation of a commit
///
/// Carries only what graph walks need: identity, parent links, and the paths
/// removed relative to the first parent.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    /// The commit's object ID
    pub oid: ObjectId,
    /// The commit's parent object IDs
    pub parents: Vec<ObjectId>,
    /// Paths removed relative to the first parent
    pub deleted: BTreeSet<PathBuf>,
}

impl SlimCommit {
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.parents.get(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn reparse(commit: &Commit) -> anyhow::Result<Commit> {
        let bytes = commit.serialize()?;
        let mut reader = Cursor::new(bytes);
        ObjectType::parse_object_type(&mut reader)?;
        Commit::deserialize(reader)
    }

    fn oid(filler: char) -> ObjectId {
        ObjectId::try_parse(filler.to_string().repeat(40)).unwrap()
    }

    #[test]
    fn root_commit_sits_at_the_epoch() {
        let root = Commit::root();

        assert_eq!(root.message(), "initial commit");
        assert_eq!(root.parent(), None);
        assert!(root.snapshot().is_empty());
        assert_eq!(root.readable_timestamp(), "Thu Jan 01 00:00:00 1970 +0000");
    }

    #[test]
    fn root_commit_id_is_stable() -> anyhow::Result<()> {
        assert_eq!(Commit::root().object_id()?, Commit::root().object_id()?);

        Ok(())
    }

    #[test]
    fn merge_commit_roundtrips() -> anyhow::Result<()> {
        let timestamp = chrono::DateTime::parse_from_rfc3339("2024-06-01T10:20:30+02:00")?;
        let snapshot = BTreeMap::from([
            (PathBuf::from("a.txt"), oid('a')),
            (PathBuf::from("dir/with space.txt"), oid('b')),
        ]);
        let deleted = BTreeSet::from([PathBuf::from("gone.txt")]);
        let commit = Commit::new(
            vec![oid('1'), oid('2')],
            timestamp,
            snapshot,
            deleted,
            "Merged feature into master.".to_string(),
        );

        let parsed = reparse(&commit)?;

        assert_eq!(commit, parsed);
        assert_eq!(parsed.timestamp().timestamp(), timestamp.timestamp());
        assert!(parsed.is_merge());

        Ok(())
    }

    #[test]
    fn reparsing_preserves_the_object_id() -> anyhow::Result<()> {
        let commit = Commit::new(
            vec![oid('c')],
            chrono::DateTime::parse_from_rfc3339("2023-11-09T20:00:05-08:00")?,
            BTreeMap::from([(PathBuf::from("wug.txt"), oid('d'))]),
            BTreeSet::new(),
            "added wug".to_string(),
        );

        assert_eq!(commit.object_id()?, reparse(&commit)?.object_id()?);

        Ok(())
    }

    #[test]
    fn multiline_message_survives() -> anyhow::Result<()> {
        let commit = Commit::new(
            vec![oid('e')],
            chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset(),
            BTreeMap::new(),
            BTreeSet::from([PathBuf::from("a.txt"), PathBuf::from("b.txt")]),
            "first line\n\nbody after a blank".to_string(),
        );

        let parsed = reparse(&commit)?;

        assert_eq!(parsed.message(), "first line\n\nbody after a blank");
        assert_eq!(parsed.deleted().len(), 2);

        Ok(())
    }

    #[test]
    fn offsets_are_kept_not_normalized() -> anyhow::Result<()> {
        let timestamp = chrono::DateTime::parse_from_rfc3339("2024-01-15T23:59:59-07:30")?;
        let commit = Commit::new(
            vec![],
            timestamp,
            BTreeMap::new(),
            BTreeSet::new(),
            "offset check".to_string(),
        );

        let parsed = reparse(&commit)?;

        assert_eq!(parsed.readable_timestamp(), commit.readable_timestamp());
        assert!(parsed.readable_timestamp().ends_with("-0730"));

        Ok(())
    }
}
