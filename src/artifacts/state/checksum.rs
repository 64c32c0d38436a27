//! Checksummed stream wrapper
//!
//! Every byte read or written through the wrapper also feeds a running SHA-1,
//! so a file can end with a 20-byte digest of everything before it. Readers
//! call [`Checksum::verify`] after consuming the payload; writers call
//! [`Checksum::write_checksum`] to append the digest.

use crate::artifacts::state::CHECKSUM_SIZE;
use anyhow::anyhow;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

pub struct Checksum<T> {
    inner: T,
    hasher: Sha1,
}

impl<T> Checksum<T> {
    pub fn new(inner: T) -> Self {
        Checksum {
            inner,
            hasher: Sha1::new(),
        }
    }
}

impl<T: Read> Checksum<T> {
    pub fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0u8; size];
        self.inner.read_exact(&mut buffer)?;
        self.hasher.update(&buffer);

        Ok(Bytes::from(buffer))
    }

    /// Compare the trailing stored digest against the bytes consumed so far
    pub fn verify(mut self) -> anyhow::Result<()> {
        let mut stored = [0u8; CHECKSUM_SIZE];
        self.inner.read_exact(&mut stored)?;

        let computed = self.hasher.finalize();
        if stored.as_slice() != computed.as_slice() {
            return Err(anyhow!("Checksum does not match stored value"));
        }

        Ok(())
    }
}

impl<T: Write> Checksum<T> {
    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.inner.write_all(data)?;
        self.hasher.update(data);

        Ok(())
    }

    /// Append the digest of everything written and hand back the sink
    pub fn write_checksum(mut self) -> anyhow::Result<T> {
        let digest = self.hasher.finalize();
        self.inner.write_all(&digest)?;

        Ok(self.inner)
    }
}
