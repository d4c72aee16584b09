use serde::{Deserialize, Serialize};
use std::fmt;

/// Language tag carried by every source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Javascript,
    Jsx,
    Typescript,
    Tsx,
    Vue,
    Python,
    Markdown,
    Json,
    Plaintext,
}

impl Language {
    /// Infer a language from a file name or path extension
    pub fn from_path(path: &str) -> Self {
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "html" | "htm" => Language::Html,
            "css" => Language::Css,
            "js" | "mjs" | "cjs" => Language::Javascript,
            "jsx" => Language::Jsx,
            "ts" => Language::Typescript,
            "tsx" => Language::Tsx,
            "vue" => Language::Vue,
            "py" => Language::Python,
            "md" | "markdown" => Language::Markdown,
            "json" => Language::Json,
            _ => Language::Plaintext,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::Javascript => "javascript",
            Language::Jsx => "jsx",
            Language::Typescript => "typescript",
            Language::Tsx => "tsx",
            Language::Vue => "vue",
            Language::Python => "python",
            Language::Markdown => "markdown",
            Language::Json => "json",
            Language::Plaintext => "plaintext",
        }
    }

    /// Logical role of files written in this language
    pub fn role(&self) -> FileRole {
        match self {
            Language::Html => FileRole::Markup,
            Language::Css => FileRole::Style,
            Language::Javascript | Language::Typescript => FileRole::Script,
            Language::Jsx | Language::Tsx | Language::Vue => FileRole::Component,
            Language::Python | Language::Markdown | Language::Json | Language::Plaintext => {
                FileRole::Other
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a file contributes to an assembled document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Markup,
    Style,
    Script,
    Component,
    Other,
}

/// A single named source file owned by a [`crate::FileSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Display name, usually the last path segment (e.g. `App.jsx`)
    pub name: String,

    /// Unique path within the file set (e.g. `app/page.jsx`)
    pub path: String,

    pub content: String,

    pub language: Language,
}

impl SourceFile {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
            language,
        }
    }

    /// Create a file from a path, inferring its name and language
    pub fn from_path(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let language = Language::from_path(&path);

        Self {
            name,
            path,
            content: content.into(),
            language,
        }
    }

    pub fn role(&self) -> FileRole {
        self.language.role()
    }

    /// Case-sensitive check on the file name suffix
    pub fn has_extension(&self, extension: &str) -> bool {
        self.name.ends_with(extension)
    }
}
