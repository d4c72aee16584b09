//! # Edit Session Management
//!
//! One user's editing state: the files, the open tabs, and which tab is
//! active. The session owns the [`FileSet`] and is its only writer.

use crate::text;
use crate::EditorError;
use codenano_common::{FileSet, SourceFile};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Default)]
pub struct EditSession {
    files: FileSet,
    tabs: Vec<String>,
    active: Option<String>,
    /// Bumped on every content or file list change
    version: u64,
}

/// Serializable view of the session for hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub tabs: Vec<String>,
    pub active: Option<String>,
    pub version: u64,
}

impl EditSession {
    /// Start a session. The first file, if any, is opened.
    pub fn new(files: FileSet) -> Self {
        let mut session = Self {
            files,
            ..Default::default()
        };
        if let Some(first) = session.files.iter().next().map(|f| f.path.clone()) {
            session.tabs.push(first.clone());
            session.active = Some(first);
        }
        session
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn into_files(self) -> FileSet {
        self.files
    }

    /// Replace every file, e.g. after loading a project. Tabs whose file
    /// disappeared are closed.
    pub fn replace_files(&mut self, files: FileSet) {
        self.files = files;
        self.tabs.retain(|path| self.files.contains(path));
        if !self
            .active
            .as_ref()
            .is_some_and(|path| self.tabs.contains(path))
        {
            self.active = self.tabs.first().cloned();
        }
        if self.active.is_none() {
            if let Some(first) = self.files.iter().next().map(|f| f.path.clone()) {
                self.tabs.push(first.clone());
                self.active = Some(first);
            }
        }
        self.version += 1;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn tabs(&self) -> &[String] {
        &self.tabs
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            tabs: self.tabs.clone(),
            active: self.active.clone(),
            version: self.version,
        }
    }

    /// Open a tab for `path` and make it active
    pub fn open(&mut self, path: &str) -> Result<(), EditorError> {
        self.require(path)?;
        if !self.tabs.iter().any(|tab| tab == path) {
            self.tabs.push(path.to_string());
        }
        self.active = Some(path.to_string());
        Ok(())
    }

    /// Close the tab for `path`. When it was active, its right neighbour
    /// (or else its left one) becomes active.
    pub fn close(&mut self, path: &str) -> Result<Option<&SourceFile>, EditorError> {
        let index = self
            .tabs
            .iter()
            .position(|tab| tab == path)
            .ok_or_else(|| EditorError::NotOpen {
                path: path.to_string(),
            })?;

        self.tabs.remove(index);

        if self.active.as_deref() == Some(path) {
            let next = index.min(self.tabs.len().saturating_sub(1));
            self.active = self.tabs.get(next).cloned();
        }

        Ok(self.active_file())
    }

    /// Make an already open tab active
    pub fn activate(&mut self, path: &str) -> Result<(), EditorError> {
        if !self.tabs.iter().any(|tab| tab == path) {
            return Err(EditorError::NotOpen {
                path: path.to_string(),
            });
        }
        self.active = Some(path.to_string());
        Ok(())
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_file(&self) -> Option<&SourceFile> {
        self.active.as_deref().and_then(|path| self.files.get(path))
    }

    /// Write new content straight through to the file set
    pub fn set_content(&mut self, path: &str, content: String) -> Result<(), EditorError> {
        self.files.update_content(path, content)?;
        self.version += 1;
        Ok(())
    }

    /// Insert a literal two-space tab at byte `cursor` and return the cursor
    /// after it
    pub fn insert_tab(&mut self, path: &str, cursor: usize) -> Result<usize, EditorError> {
        let file = self
            .files
            .get_mut(path)
            .ok_or_else(|| codenano_common::FileSetError::NotFound {
                path: path.to_string(),
            })?;

        let cursor = text::insert_tab(&mut file.content, cursor);
        self.version += 1;
        Ok(cursor)
    }

    /// Gutter line numbers for `path`
    pub fn line_numbers(&self, path: &str) -> Result<RangeInclusive<usize>, EditorError> {
        Ok(text::line_numbers(&self.require(path)?.content))
    }

    /// Add an empty file, inferring its language from the name, and open it
    pub fn create_file(&mut self, name: &str) -> Result<&SourceFile, EditorError> {
        let name = name.trim();
        if name.is_empty() || name.ends_with('/') || name.split('/').any(|part| part == "..") {
            return Err(EditorError::InvalidName {
                name: name.to_string(),
            });
        }

        self.files.insert(SourceFile::from_path(name, ""))?;
        self.version += 1;
        tracing::debug!("Created {}", name);

        self.open(name)?;
        self.require(name)
    }

    /// Remove a file. This is the only way files leave the set.
    pub fn delete_file(&mut self, path: &str) -> Result<SourceFile, EditorError> {
        let removed = self.files.remove(path)?;
        if self.tabs.iter().any(|tab| tab == path) {
            self.close(path)?;
        }
        self.version += 1;
        tracing::debug!("Deleted {}", path);
        Ok(removed)
    }

    fn require(&self, path: &str) -> Result<&SourceFile, EditorError> {
        self.files.get(path).ok_or_else(|| {
            EditorError::FileSet(codenano_common::FileSetError::NotFound {
                path: path.to_string(),
            })
        })
    }
}
