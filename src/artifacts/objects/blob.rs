//! Blob object
//!
//! A blob stores one working file: its repository-relative path and its full
//! text content. Unlike plain content-addressed stores, the path is part of
//! the hashed body, so the same content saved under two paths yields two
//! distinct blobs. Blob equality anywhere in the engine therefore reduces to
//! object-id equality.
//!
//! ## Format
//!
//! On disk: `blob <size>\0path <path>\n<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Blob object representing one working file
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    /// Working path relative to the repository root
    path: PathBuf,
    /// File content as a string
    content: String,
}

impl Blob {
    /// Get the working path this blob was captured from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content as a string
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        content_bytes.write_all(format!("path {}\n", self.path.display()).as_bytes())?;
        content_bytes.write_all(self.content.as_bytes())?;

        let mut blob_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let mut path_line = String::new();
        reader.read_line(&mut path_line)?;
        let path = path_line
            .strip_prefix("path ")
            .and_then(|path| path.strip_suffix('\n'))
            .context("Invalid blob object: missing path line")?;
        let path = PathBuf::from(path);

        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        Ok(Self::new(path, content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        self.content.to_string()
    }
}
