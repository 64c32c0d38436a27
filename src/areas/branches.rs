use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Branch pointer files
///
/// One file per branch, holding the 40-hex head commit id and a trailing
/// newline. Which branches exist is tracked by the repository-state record;
/// this area reads and rewrites the pointer files themselves.
#[derive(Debug)]
pub struct Branches {
    path: Box<Path>,
}

impl Branches {
    pub fn new(path: Box<Path>) -> Self {
        Branches { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn branch_path(&self, name: &BranchName) -> PathBuf {
        self.path.join(name.as_ref())
    }

    pub fn read_head(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(name);

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("Unable to read branch file {}", branch_path.display()))?;

        ObjectId::try_parse(content.trim().to_string())
            .with_context(|| format!("Corrupt branch pointer in {}", branch_path.display()))
    }

    pub fn write_head(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.path).with_context(|| {
            format!("Unable to create branches directory {}", self.path.display())
        })?;

        let branch_path = self.branch_path(name);
        let temp_path = self.path.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open branch file {}", temp_path.display()))?;

        writeln!(file, "{}", oid)
            .with_context(|| format!("Unable to write branch file {}", temp_path.display()))?;

        std::fs::rename(&temp_path, &branch_path).with_context(|| {
            format!("Unable to rename branch file to {}", branch_path.display())
        })?;

        Ok(())
    }

    pub fn delete(&self, name: &BranchName) -> anyhow::Result<()> {
        let branch_path = self.branch_path(name);

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("Unable to delete branch file {}", branch_path.display()))
    }

    fn generate_temp_name() -> String {
        format!("tmp-branch-{}", rand::random::<u32>())
    }
}
