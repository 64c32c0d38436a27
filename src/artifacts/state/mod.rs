//! Repository state record format
//!
//! One binary file under the state directory carries everything about the
//! repository that is not an object or a branch pointer: the current branch,
//! the branch-name set, the staged additions and removals, and the recorded
//! remotes.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (24 bytes):
//!   - Signature: "TWST" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Section counts: branches, additions, removals, remotes (4 bytes each)
//!
//! Body (variable length, all integers big-endian):
//!   - Current branch name (u16 length + UTF-8 bytes)
//!   - Branch names, sorted
//!   - Additions, sorted by path: path string + 40 hex bytes of the blob ID
//!   - Removal paths, sorted
//!   - Remotes, sorted by name: name string + path string
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! Sorted sections make the serialized bytes a pure function of the logical
//! state.

pub mod checksum;

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::state::checksum::Checksum;
use anyhow::{Context, anyhow};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the state header in bytes
pub const HEADER_SIZE: usize = 24;

/// Magic signature identifying state files
pub const SIGNATURE: &str = "TWST";

/// State file format version
pub const VERSION: u32 = 1;

/// State file header
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StateHeader {
    pub marker: String,
    pub version: u32,
    pub branches_count: u32,
    pub additions_count: u32,
    pub removals_count: u32,
    pub remotes_count: u32,
}

impl StateHeader {
    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(self.marker.as_bytes())?;
        bytes.write_u32::<BigEndian>(self.version)?;
        bytes.write_u32::<BigEndian>(self.branches_count)?;
        bytes.write_u32::<BigEndian>(self.additions_count)?;
        bytes.write_u32::<BigEndian>(self.removals_count)?;
        bytes.write_u32::<BigEndian>(self.remotes_count)?;

        Ok(Bytes::from(bytes))
    }

    pub fn deserialize(mut reader: impl Read) -> anyhow::Result<Self> {
        let mut marker = [0u8; 4];
        reader.read_exact(&mut marker)?;
        let marker = String::from_utf8(marker.to_vec())?;

        let version = reader.read_u32::<BigEndian>()?;
        let branches_count = reader.read_u32::<BigEndian>()?;
        let additions_count = reader.read_u32::<BigEndian>()?;
        let removals_count = reader.read_u32::<BigEndian>()?;
        let remotes_count = reader.read_u32::<BigEndian>()?;

        Ok(StateHeader::new(
            marker,
            version,
            branches_count,
            additions_count,
            removals_count,
            remotes_count,
        ))
    }
}

/// Everything the repository remembers between invocations, apart from
/// objects and branch pointer files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoState {
    /// Name of the branch new commits advance
    pub current_branch: String,
    /// Every branch name; the authority for existence checks
    pub branches: BTreeSet<String>,
    /// Staged additions: working path mapped to the staged blob's ID
    pub additions: BTreeMap<PathBuf, ObjectId>,
    /// Paths marked for removal by the next commit
    pub removals: BTreeSet<PathBuf>,
    /// Recorded remotes; bookkeeping only, nothing reads the paths
    pub remotes: BTreeMap<String, PathBuf>,
}

impl RepoState {
    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut writer = Checksum::new(Vec::new());

        let header = StateHeader::new(
            SIGNATURE.to_string(),
            VERSION,
            self.branches.len() as u32,
            self.additions.len() as u32,
            self.removals.len() as u32,
            self.remotes.len() as u32,
        );
        writer.write(&header.serialize()?)?;

        write_string(&mut writer, &self.current_branch)?;
        for name in &self.branches {
            write_string(&mut writer, name)?;
        }
        for (path, oid) in &self.additions {
            write_string(&mut writer, &path.to_string_lossy())?;
            writer.write(oid.as_ref().as_bytes())?;
        }
        for path in &self.removals {
            write_string(&mut writer, &path.to_string_lossy())?;
        }
        for (name, path) in &self.remotes {
            write_string(&mut writer, name)?;
            write_string(&mut writer, &path.to_string_lossy())?;
        }

        let bytes = writer.write_checksum()?;
        Ok(Bytes::from(bytes))
    }

    /// Parse a state record, verifying signature, version, and checksum
    pub fn deserialize(bytes: Bytes) -> anyhow::Result<Self> {
        let mut reader = Checksum::new(Cursor::new(bytes));

        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = StateHeader::deserialize(Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid state file signature"));
        }
        if header.version != VERSION {
            return Err(anyhow!("Unsupported state file version: {}", header.version));
        }

        let current_branch = read_string(&mut reader)?;

        let mut branches = BTreeSet::new();
        for _ in 0..header.branches_count {
            branches.insert(read_string(&mut reader)?);
        }

        let mut additions = BTreeMap::new();
        for _ in 0..header.additions_count {
            let path = PathBuf::from(read_string(&mut reader)?);
            let oid = reader.read(OBJECT_ID_LENGTH)?;
            let oid = ObjectId::try_parse(String::from_utf8(oid.to_vec())?)?;
            additions.insert(path, oid);
        }

        let mut removals = BTreeSet::new();
        for _ in 0..header.removals_count {
            removals.insert(PathBuf::from(read_string(&mut reader)?));
        }

        let mut remotes = BTreeMap::new();
        for _ in 0..header.remotes_count {
            let name = read_string(&mut reader)?;
            let path = PathBuf::from(read_string(&mut reader)?);
            remotes.insert(name, path);
        }

        reader.verify()?;

        Ok(RepoState {
            current_branch,
            branches,
            additions,
            removals,
            remotes,
        })
    }
}

fn write_string(writer: &mut Checksum<Vec<u8>>, value: &str) -> anyhow::Result<()> {
    let length: u16 = value
        .len()
        .try_into()
        .context("String too long for state record")?;

    let mut length_bytes = Vec::with_capacity(2);
    length_bytes.write_u16::<BigEndian>(length)?;
    writer.write(&length_bytes)?;
    writer.write(value.as_bytes())?;

    Ok(())
}

fn read_string(reader: &mut Checksum<Cursor<Bytes>>) -> anyhow::Result<String> {
    let length_bytes = reader.read(2)?;
    let length = Cursor::new(length_bytes).read_u16::<BigEndian>()?;

    let value = reader.read(length as usize)?;
    String::from_utf8(value.to_vec()).context("Invalid UTF-8 in state record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn oid(filler: char) -> ObjectId {
        ObjectId::try_parse(filler.to_string().repeat(OBJECT_ID_LENGTH)).unwrap()
    }

    fn populated() -> RepoState {
        RepoState {
            current_branch: "master".to_string(),
            branches: BTreeSet::from(["master".to_string(), "feature".to_string()]),
            additions: BTreeMap::from([
                (PathBuf::from("a.txt"), oid('a')),
                (PathBuf::from("dir/b.txt"), oid('b')),
            ]),
            removals: BTreeSet::from([PathBuf::from("gone.txt")]),
            remotes: BTreeMap::from([("origin".to_string(), PathBuf::from("/tmp/elsewhere"))]),
        }
    }

    #[test]
    fn roundtrips_a_populated_record() -> anyhow::Result<()> {
        let state = populated();

        let parsed = RepoState::deserialize(state.serialize()?)?;

        assert_eq!(state, parsed);

        Ok(())
    }

    #[test]
    fn roundtrips_the_freshly_initialized_record() -> anyhow::Result<()> {
        let state = RepoState {
            current_branch: "master".to_string(),
            branches: BTreeSet::from(["master".to_string()]),
            ..Default::default()
        };

        let parsed = RepoState::deserialize(state.serialize()?)?;

        assert_eq!(state, parsed);

        Ok(())
    }

    #[test]
    fn serialization_is_deterministic() -> anyhow::Result<()> {
        assert_eq!(populated().serialize()?, populated().serialize()?);

        Ok(())
    }

    #[test]
    fn rejects_a_flipped_payload_byte() -> anyhow::Result<()> {
        let mut bytes = populated().serialize()?.to_vec();
        let flip_at = HEADER_SIZE + 3;
        bytes[flip_at] ^= 0x01;

        let result = RepoState::deserialize(Bytes::from(bytes));

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn rejects_a_foreign_signature() -> anyhow::Result<()> {
        let mut bytes = populated().serialize()?.to_vec();
        bytes[0] = b'X';

        let result = RepoState::deserialize(Bytes::from(bytes));

        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn rejects_a_truncated_record() -> anyhow::Result<()> {
        let bytes = populated().serialize()?;
        let truncated = bytes.slice(..bytes.len() - CHECKSUM_SIZE - 1);

        let result = RepoState::deserialize(truncated);

        assert!(result.is_err());

        Ok(())
    }
}
