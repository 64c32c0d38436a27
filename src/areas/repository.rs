use crate::areas::branches::Branches;
use crate::areas::object_store::ObjectStore;
use crate::areas::staging::Staging;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::state::RepoState;
use crate::errors::OpError;
use anyhow::Context;
use fake::rand;
use file_guard::{FileGuard, Lock};
use std::cell::{RefCell, RefMut};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const REPO_DIR: &str = ".twig";
const OBJECTS_DIR: &str = "objects";
const STAGED_DIR: &str = "staged";
const BRANCHES_DIR: &str = "branches";
const STATE_FILE: &str = "state";
const LOCK_FILE: &str = "lock";

pub const DEFAULT_BRANCH: &str = "master";

/// The repository: workspace plus data directory plus in-memory state
///
/// One instance serves one command invocation. Construction takes a blocking
/// exclusive lock on the data directory, so concurrent invocations queue up
/// rather than interleave. Mutations accumulate in [`RepoState`] and in the
/// stores; [`save`](Repository::save) persists the state record last, so a
/// command that fails midway leaves the previous state in force.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    state: RepoState,
    object_store: ObjectStore,
    staging: Staging,
    branches: Branches,
    workspace: Workspace,
    _lock: FileGuard<Box<File>>,
}

impl Repository {
    /// Create a fresh repository at `path` and return it, open and locked
    ///
    /// Lays out the data directory, stores the root commit, and points the
    /// default branch at it.
    pub fn init_at(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Invalid workspace path {}", path.display()))?;
        let repo_path = path.join(REPO_DIR);

        if repo_path.exists() {
            return Err(OpError::RepositoryExists.into());
        }

        for dir in [OBJECTS_DIR, STAGED_DIR, BRANCHES_DIR] {
            std::fs::create_dir_all(repo_path.join(dir))
                .with_context(|| format!("Failed to create {}/{}", REPO_DIR, dir))?;
        }

        let lock = Self::acquire_lock(&repo_path)?;
        let (object_store, staging, branches, workspace) = Self::build_areas(&path, &repo_path);

        let root = Commit::root();
        let root_oid = object_store.store(&root)?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH)?;
        branches.write_head(&default_branch, &root_oid)?;

        let state = RepoState {
            current_branch: DEFAULT_BRANCH.to_string(),
            branches: [DEFAULT_BRANCH.to_string()].into(),
            ..Default::default()
        };

        let mut repository = Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            state,
            object_store,
            staging,
            branches,
            workspace,
            _lock: lock,
        };
        repository.save()?;

        Ok(repository)
    }

    /// Open an existing repository, taking the invocation lock
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path
            .canonicalize()
            .with_context(|| format!("Invalid workspace path {}", path.display()))?;
        let repo_path = path.join(REPO_DIR);

        if !repo_path.is_dir() {
            return Err(OpError::RepositoryNotFound.into());
        }

        let lock = Self::acquire_lock(&repo_path)?;

        let state_path = repo_path.join(STATE_FILE);
        let state_bytes = std::fs::read(&state_path)
            .with_context(|| format!("Unable to read state record {}", state_path.display()))?;
        let state = RepoState::deserialize(state_bytes.into())
            .with_context(|| format!("Corrupt state record {}", state_path.display()))?;

        let (object_store, staging, branches, workspace) = Self::build_areas(&path, &repo_path);

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            state,
            object_store,
            staging,
            branches,
            workspace,
            _lock: lock,
        })
    }

    /// Persist the state record; every mutating command ends with this
    pub(crate) fn save(&mut self) -> anyhow::Result<()> {
        let repo_path = self.path.join(REPO_DIR);
        let state_path = repo_path.join(STATE_FILE);
        let temp_path = repo_path.join(format!("tmp-state-{}", rand::random::<u32>()));

        let content = self.state.serialize()?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open state record {}", temp_path.display()))?;

        file.write_all(&content)
            .with_context(|| format!("Unable to write state record {}", temp_path.display()))?;

        std::fs::rename(&temp_path, &state_path).with_context(|| {
            format!("Unable to rename state record to {}", state_path.display())
        })?;

        Ok(())
    }

    fn build_areas(path: &Path, repo_path: &Path) -> (ObjectStore, Staging, Branches, Workspace) {
        (
            ObjectStore::new(repo_path.join(OBJECTS_DIR).into_boxed_path()),
            Staging::new(repo_path.join(STAGED_DIR).into_boxed_path()),
            Branches::new(repo_path.join(BRANCHES_DIR).into_boxed_path()),
            Workspace::new(path.to_path_buf().into_boxed_path()),
        )
    }

    fn acquire_lock(repo_path: &Path) -> anyhow::Result<FileGuard<Box<File>>> {
        let lock_path = repo_path.join(LOCK_FILE);
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Unable to open lock file {}", lock_path.display()))?;

        file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock {}", lock_path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub(crate) fn state(&self) -> &RepoState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut RepoState {
        &mut self.state
    }

    pub(crate) fn object_store(&self) -> &ObjectStore {
        &self.object_store
    }

    pub(crate) fn staging(&self) -> &Staging {
        &self.staging
    }

    pub(crate) fn branches(&self) -> &Branches {
        &self.branches
    }

    pub(crate) fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn current_branch(&self) -> &str {
        &self.state.current_branch
    }

    pub fn head_commit_id(&self) -> anyhow::Result<ObjectId> {
        let current = BranchName::try_parse(self.state.current_branch.clone())?;
        self.branches.read_head(&current)
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.object_store.read_commit(&self.head_commit_id()?)
    }

    /// Working files neither tracked by the head commit nor pending addition
    pub(crate) fn untracked_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        let head = self.head_commit()?;

        Ok(self
            .workspace
            .list_files()?
            .into_iter()
            .filter(|path| !head.tracks(path) && !self.state.additions.contains_key(path))
            .collect())
    }
}
