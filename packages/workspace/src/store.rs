//! Project persistence.
//!
//! The preview core only needs three calls from storage: load a project,
//! save one, and list an owner's projects. [`ProjectStore`] is that seam;
//! transport, auth and schema stay on the other side of it.

use chrono::{DateTime, Utc};
use codenano_common::{FileSet, Mode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Owner assigned to projects created by a local, single-user host
pub const LOCAL_OWNER: &str = "local";

const MAX_ID_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Project not found: {id}")]
    NotFound { id: String },

    #[error("Invalid project id '{id}' (use 1-64 letters, digits, '-' or '_')")]
    InvalidId { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed project data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub mode: Mode,
    pub files: FileSet,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub mode: Mode,
    pub file_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            owner_id: project.owner_id.clone(),
            name: project.name.clone(),
            mode: project.mode,
            file_count: project.files.len(),
            updated_at: project.updated_at,
        }
    }
}

pub trait ProjectStore: Send + Sync {
    fn load_project(&self, id: &str) -> StoreResult<Project>;

    /// Create or overwrite a project. An existing project keeps its owner
    /// and name.
    fn save_project(&self, id: &str, files: &FileSet, mode: Mode) -> StoreResult<()>;

    /// Projects of `owner_id`, most recently updated first
    fn list_projects(&self, owner_id: &str) -> StoreResult<Vec<ProjectSummary>>;
}

pub fn validate_id(id: &str) -> StoreResult<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId { id: id.to_string() })
    }
}

fn next_version(previous: Option<Project>, owner: &str, id: &str, files: &FileSet, mode: Mode) -> Project {
    let (owner_id, name) = match previous {
        Some(project) => (project.owner_id, project.name),
        None => (owner.to_string(), id.to_string()),
    };

    Project {
        id: id.to_string(),
        owner_id,
        name,
        mode,
        files: files.clone(),
        updated_at: Utc::now(),
    }
}

fn sorted_summaries<'a>(projects: impl Iterator<Item = &'a Project>, owner_id: &str) -> Vec<ProjectSummary> {
    let mut summaries: Vec<ProjectSummary> = projects
        .filter(|project| project.owner_id == owner_id)
        .map(ProjectSummary::from)
        .collect();
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
    summaries
}

/// In-memory store, used by tests and as a scratch store for `serve`
#[derive(Debug)]
pub struct MemoryProjectStore {
    owner: String,
    projects: RwLock<BTreeMap<String, Project>>,
}

impl Default for MemoryProjectStore {
    fn default() -> Self {
        Self::new(LOCAL_OWNER)
    }
}

impl MemoryProjectStore {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            projects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert a complete project, replacing any with the same id
    pub fn insert(&self, project: Project) -> StoreResult<()> {
        validate_id(&project.id)?;
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        projects.insert(project.id.clone(), project);
        Ok(())
    }
}

impl ProjectStore for MemoryProjectStore {
    fn load_project(&self, id: &str) -> StoreResult<Project> {
        validate_id(id)?;
        let projects = self.projects.read().unwrap_or_else(|e| e.into_inner());
        projects
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }

    fn save_project(&self, id: &str, files: &FileSet, mode: Mode) -> StoreResult<()> {
        validate_id(id)?;
        let mut projects = self.projects.write().unwrap_or_else(|e| e.into_inner());
        let project = next_version(projects.remove(id), &self.owner, id, files, mode);
        projects.insert(id.to_string(), project);
        Ok(())
    }

    fn list_projects(&self, owner_id: &str) -> StoreResult<Vec<ProjectSummary>> {
        let projects = self.projects.read().unwrap_or_else(|e| e.into_inner());
        Ok(sorted_summaries(projects.values(), owner_id))
    }
}

/// One JSON document per project under a root directory
#[derive(Debug, Clone)]
pub struct FsProjectStore {
    root: PathBuf,
    owner: String,
}

impl FsProjectStore {
    pub fn new(root: impl Into<PathBuf>, owner: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            owner: owner.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    fn read(&self, path: &Path) -> StoreResult<Project> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl ProjectStore for FsProjectStore {
    fn load_project(&self, id: &str) -> StoreResult<Project> {
        validate_id(id)?;
        let path = self.project_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        self.read(&path)
    }

    fn save_project(&self, id: &str, files: &FileSet, mode: Mode) -> StoreResult<()> {
        validate_id(id)?;
        fs::create_dir_all(&self.root)?;

        let path = self.project_path(id);
        let previous = if path.exists() {
            Some(self.read(&path)?)
        } else {
            None
        };
        let project = next_version(previous, &self.owner, id, files, mode);

        // Write then rename so readers never see half a project
        let staging = self.root.join(format!(".{}.json.tmp", id));
        fs::write(&staging, serde_json::to_string_pretty(&project)?)?;
        fs::rename(&staging, &path)?;

        tracing::info!("Saved project {} ({} files)", id, files.len());
        Ok(())
    }

    fn list_projects(&self, owner_id: &str) -> StoreResult<Vec<ProjectSummary>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_project = path.extension().is_some_and(|ext| ext == "json")
                && !path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with('.'));
            if !is_project {
                continue;
            }

            match self.read(&path) {
                Ok(project) => projects.push(project),
                Err(err) => tracing::warn!("Skipping unreadable project {:?}: {}", path, err),
            }
        }

        Ok(sorted_summaries(projects.iter(), owner_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenano_common::SourceFile;

    fn files() -> FileSet {
        FileSet::from_files(vec![SourceFile::from_path("App.jsx", "function App() {}")]).unwrap()
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("my-project_1").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("../etc/passwd").is_err());
        assert!(validate_id(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_memory_round_trip() {
        let store = MemoryProjectStore::default();
        store.save_project("demo", &files(), Mode::React).unwrap();

        let project = store.load_project("demo").unwrap();
        assert_eq!(project.mode, Mode::React);
        assert_eq!(project.owner_id, LOCAL_OWNER);
        assert_eq!(project.name, "demo");
        assert_eq!(project.files, files());
    }

    #[test]
    fn test_memory_missing_project() {
        let store = MemoryProjectStore::default();
        assert!(matches!(
            store.load_project("nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_save_keeps_owner_and_name() {
        let store = MemoryProjectStore::new("alice");
        store
            .insert(Project {
                id: "shared".to_string(),
                owner_id: "bob".to_string(),
                name: "Bob's page".to_string(),
                mode: Mode::Html,
                files: FileSet::new(),
                updated_at: Utc::now(),
            })
            .unwrap();

        store.save_project("shared", &files(), Mode::React).unwrap();
        let project = store.load_project("shared").unwrap();

        assert_eq!(project.owner_id, "bob");
        assert_eq!(project.name, "Bob's page");
        assert_eq!(project.mode, Mode::React);
    }

    #[test]
    fn test_list_filters_by_owner() {
        let store = MemoryProjectStore::new("alice");
        store.save_project("one", &files(), Mode::React).unwrap();
        store.save_project("two", &FileSet::new(), Mode::Html).unwrap();

        let listed = store.list_projects("alice").unwrap();
        assert_eq!(listed.len(), 2);
        assert!(store.list_projects("bob").unwrap().is_empty());
    }
}
