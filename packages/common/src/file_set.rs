//! # File Set
//!
//! Ordered collection of [`SourceFile`]s with unique paths.
//!
//! Insertion order is significant: resolvers pick the *first* matching file,
//! so the order the editor created files in decides which one wins. Files are
//! only ever removed through [`FileSet::remove`].

use crate::error::FileSetError;
use crate::source_file::SourceFile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SourceFile>", into = "Vec<SourceFile>")]
pub struct FileSet {
    files: Vec<SourceFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Build a file set, rejecting duplicate paths
    pub fn from_files(files: Vec<SourceFile>) -> Result<Self, FileSetError> {
        let mut set = Self::new();
        for file in files {
            set.insert(file)?;
        }
        Ok(set)
    }

    /// Append a file. Paths must be unique.
    pub fn insert(&mut self, file: SourceFile) -> Result<(), FileSetError> {
        if self.contains(&file.path) {
            return Err(FileSetError::DuplicatePath { path: file.path });
        }
        self.files.push(file);
        Ok(())
    }

    /// Replace the content of an existing file
    pub fn update_content(&mut self, path: &str, content: String) -> Result<(), FileSetError> {
        let file = self
            .get_mut(path)
            .ok_or_else(|| FileSetError::NotFound {
                path: path.to_string(),
            })?;
        file.content = content;
        Ok(())
    }

    /// Insert the file, or replace the content of the file already at its path
    pub fn upsert(&mut self, file: SourceFile) {
        match self.get_mut(&file.path) {
            Some(existing) => {
                existing.content = file.content;
                existing.language = file.language;
            }
            None => self.files.push(file),
        }
    }

    pub fn remove(&mut self, path: &str) -> Result<SourceFile, FileSetError> {
        let index = self
            .files
            .iter()
            .position(|f| f.path == path)
            .ok_or_else(|| FileSetError::NotFound {
                path: path.to_string(),
            })?;
        Ok(self.files.remove(index))
    }

    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut SourceFile> {
        self.files.iter_mut().find(|f| f.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// First file (in insertion order) satisfying the predicate
    pub fn find<P>(&self, predicate: P) -> Option<&SourceFile>
    where
        P: FnMut(&&SourceFile) -> bool,
    {
        self.files.iter().find(predicate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFile> {
        self.files.iter()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<SourceFile> {
        self.files
    }
}

impl TryFrom<Vec<SourceFile>> for FileSet {
    type Error = FileSetError;

    fn try_from(files: Vec<SourceFile>) -> Result<Self, Self::Error> {
        Self::from_files(files)
    }
}

impl From<FileSet> for Vec<SourceFile> {
    fn from(set: FileSet) -> Self {
        set.files
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a SourceFile;
    type IntoIter = std::slice::Iter<'a, SourceFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Language;

    fn file(path: &str, content: &str) -> SourceFile {
        SourceFile::from_path(path, content)
    }

    #[test]
    fn test_insert_rejects_duplicate_paths() {
        let mut set = FileSet::new();
        set.insert(file("index.html", "<html></html>")).unwrap();

        let err = set.insert(file("index.html", "")).unwrap_err();
        assert_eq!(
            err,
            FileSetError::DuplicatePath {
                path: "index.html".to_string()
            }
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_order_is_preserved() {
        let set = FileSet::from_files(vec![
            file("b.js", ""),
            file("a.js", ""),
            file("c.css", ""),
        ])
        .unwrap();

        assert_eq!(set.paths(), vec!["b.js", "a.js", "c.css"]);
        let first_js = set.find(|f| f.language == Language::Javascript).unwrap();
        assert_eq!(first_js.path, "b.js");
    }

    #[test]
    fn test_update_content_unknown_path() {
        let mut set = FileSet::new();
        let err = set.update_content("missing.js", "x".to_string()).unwrap_err();
        assert!(matches!(err, FileSetError::NotFound { .. }));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut set = FileSet::from_files(vec![file("a.js", "1"), file("b.js", "2")]).unwrap();
        set.upsert(file("a.js", "3"));

        assert_eq!(set.paths(), vec!["a.js", "b.js"]);
        assert_eq!(set.get("a.js").unwrap().content, "3");
    }

    #[test]
    fn test_remove_is_explicit() {
        let mut set = FileSet::from_files(vec![file("a.js", "1")]).unwrap();
        let removed = set.remove("a.js").unwrap();
        assert_eq!(removed.content, "1");
        assert!(set.is_empty());
        assert!(set.remove("a.js").is_err());
    }

    #[test]
    fn test_serializes_as_array() {
        let set = FileSet::from_files(vec![file("a.js", "1")]).unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["path"], "a.js");
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[
            {"name":"a.js","path":"a.js","content":"1","language":"javascript"},
            {"name":"a.js","path":"a.js","content":"2","language":"javascript"}
        ]"#;
        let err = serde_json::from_str::<FileSet>(json).unwrap_err();
        assert!(err.to_string().contains("a.js"));
    }
}
