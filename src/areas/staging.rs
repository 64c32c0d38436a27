use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use fake::rand;
use std::io::{Cursor, Write};
use std::path::Path;

/// Holding pen for staged blob bytes
///
/// Every pending addition keeps its blob serialized uncompressed in a flat
/// directory, named by blob id, so committing can promote the exact bytes
/// that were staged without re-reading the working tree. Which ids are
/// pending is the repository-state record's business; this area only moves
/// bytes.
#[derive(Debug)]
pub struct Staging {
    path: Box<Path>,
}

impl Staging {
    pub fn new(path: Box<Path>) -> Self {
        Staging { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_blob(&self, blob: &Blob) -> anyhow::Result<ObjectId> {
        let object_id = blob.object_id()?;
        let content = blob.serialize()?;

        std::fs::create_dir_all(&self.path).with_context(|| {
            format!("Unable to create staging directory {}", self.path.display())
        })?;

        let staged_path = self.path.join(object_id.as_ref());
        let temp_path = self.path.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open staged file {}", temp_path.display()))?;

        file.write_all(&content)
            .with_context(|| format!("Unable to write staged file {}", temp_path.display()))?;

        std::fs::rename(&temp_path, &staged_path).with_context(|| {
            format!("Unable to rename staged file to {}", staged_path.display())
        })?;

        Ok(object_id)
    }

    pub fn read_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let staged_path = self.path.join(object_id.as_ref());

        let content = std::fs::read(&staged_path)
            .with_context(|| format!("Unable to read staged file {}", staged_path.display()))?;

        let mut reader = Cursor::new(content);
        let object_type = ObjectType::parse_object_type(&mut reader)?;
        anyhow::ensure!(
            object_type == ObjectType::Blob,
            "Staged object {} is a {}, not a blob",
            object_id,
            object_type
        );

        Blob::deserialize(reader)
    }

    /// Drop one staged blob; an id with no file behind it is fine
    pub fn discard(&self, object_id: &ObjectId) -> anyhow::Result<()> {
        let staged_path = self.path.join(object_id.as_ref());

        if staged_path.exists() {
            std::fs::remove_file(&staged_path).with_context(|| {
                format!("Unable to remove staged file {}", staged_path.display())
            })?;
        }

        Ok(())
    }

    /// Delete every staged blob file
    pub fn clear(&self) -> anyhow::Result<()> {
        if !self.path.is_dir() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if entry.path().is_file() {
                std::fs::remove_file(entry.path()).with_context(|| {
                    format!("Unable to remove staged file {}", entry.path().display())
                })?;
            }
        }

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-stage-{}", rand::random::<u32>())
    }
}
