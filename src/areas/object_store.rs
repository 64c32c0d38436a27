use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::OpError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ObjectStore {
    path: Box<Path>,
}

// TODO: implement packfiles for better performance and storage efficiency
impl ObjectStore {
    pub fn new(path: Box<Path>) -> Self {
        ObjectStore { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn namespace_path(&self, object_type: ObjectType) -> PathBuf {
        self.path.join(object_type.namespace())
    }

    /// Write an object unless its file already exists, returning its id
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self
            .namespace_path(object.object_type())
            .join(object_id.to_path());

        if !object_path.exists() {
            std::fs::create_dir_all(
                object_path
                    .parent()
                    .context(format!("Invalid object path {}", object_path.display()))?,
            )
            .context(format!(
                "Unable to create object directory {}",
                object_path.display()
            ))?;

            self.write_object(object_path, object.serialize()?)?;
        }

        Ok(object_id)
    }

    pub fn contains_commit(&self, object_id: &ObjectId) -> bool {
        self.namespace_path(ObjectType::Commit)
            .join(object_id.to_path())
            .exists()
    }

    pub fn read_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (object_type, object_reader) = self.parse_object_as_bytes(ObjectType::Blob, object_id)?;

        anyhow::ensure!(
            object_type == ObjectType::Blob,
            "Object {} is a {}, not a blob",
            object_id,
            object_type
        );

        Blob::deserialize(object_reader)
    }

    pub fn read_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let (object_type, object_reader) =
            self.parse_object_as_bytes(ObjectType::Commit, object_id)?;

        anyhow::ensure!(
            object_type == ObjectType::Commit,
            "Object {} is a {}, not a commit",
            object_id,
            object_type
        );

        Commit::deserialize(object_reader)
    }

    /// Load just the graph-relevant pieces of a commit
    pub fn load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.read_commit(object_id)?.slim(object_id.clone()))
    }

    /// Resolve a user-supplied commit id, full or abbreviated
    ///
    /// A full-length id must exist in the store; a shorter hex prefix must
    /// match exactly one stored commit. Everything else reports the commit as
    /// unknown, ambiguous prefixes included.
    pub fn resolve_commit(&self, target: &str) -> anyhow::Result<ObjectId> {
        if target.len() == OBJECT_ID_LENGTH {
            let object_id = ObjectId::try_parse(target.to_string())
                .map_err(|_| OpError::UnknownCommit)?;

            return if self.contains_commit(&object_id) {
                Ok(object_id)
            } else {
                Err(OpError::UnknownCommit.into())
            };
        }

        let mut matches = self.find_commits_by_prefix(target)?;
        match (matches.pop(), matches.is_empty()) {
            (Some(object_id), true) => Ok(object_id),
            _ => Err(OpError::UnknownCommit.into()),
        }
    }

    /// Find all commits whose id starts with the given hex prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// scanned; shorter prefixes fall back to a full enumeration.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        let commits_path = self.namespace_path(ObjectType::Commit);

        if prefix.len() >= 2 {
            let dir_name = &prefix[..2];
            let file_prefix = &prefix[2..];
            let dir_path = commits_path.join(dir_name);

            if dir_path.is_dir() {
                for entry in std::fs::read_dir(&dir_path)? {
                    let entry = entry?;
                    let file_name = entry.file_name();
                    let file_name_str = file_name.to_string_lossy();

                    if file_name_str.starts_with(file_prefix) {
                        let full_oid = format!("{}{}", dir_name, file_name_str);
                        if let Ok(oid) = ObjectId::try_parse(full_oid) {
                            matches.push(oid);
                        }
                    }
                }
            }
        } else {
            for oid in self.list_commits()? {
                if oid.as_ref().starts_with(prefix) {
                    matches.push(oid);
                }
            }
        }

        Ok(matches)
    }

    /// Enumerate every commit id in the store, in directory order
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        let mut commit_ids = Vec::new();
        let commits_path = self.namespace_path(ObjectType::Commit);

        for i in 0..=255 {
            let dir_name = format!("{:02x}", i);
            let dir_path = commits_path.join(&dir_name);

            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)? {
                let entry = entry?;
                let file_name = entry.file_name();
                let full_oid = format!("{}{}", dir_name, file_name.to_string_lossy());

                if let Ok(oid) = ObjectId::try_parse(full_oid) {
                    commit_ids.push(oid);
                }
            }
        }

        Ok(commit_ids)
    }

    fn parse_object_as_bytes(
        &self,
        expected: ObjectType,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_path = self.namespace_path(expected).join(object_id.to_path());
        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
