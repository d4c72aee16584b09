use crate::diagnostic::diagnostic_document;
use crate::framework::{react_component, react_document, vue_document};
use crate::html::assemble_html;
use crate::nextjs::normalize_page;
use crate::options::AssembleOptions;
use codenano_common::{FileSet, Mode, SourceFile};
use codenano_resolver::{resolve, ResolveError, ResolvedEntry};
use thiserror::Error;

/// Errors that can occur during document assembly
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error(transparent)]
    MissingEntry(#[from] ResolveError),

    #[error("{path} contains a closing </{tag}> tag and cannot be embedded in a <{tag}> block")]
    UnterminatedBlock { path: String, tag: &'static str },

    #[error("Unsupported mode: {0}")]
    UnsupportedMode(String),
}

/// How an assembled document came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStatus {
    /// Runnable preview of the user's sources
    Ready,
    /// Placeholder explaining that the mode's entry file is absent
    MissingEntry,
    /// "Preview Error" placeholder for a failed assembly
    Failed,
}

/// A complete, self-contained markup document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledDocument {
    html: String,
    status: DocumentStatus,
}

impl AssembledDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn is_diagnostic(&self) -> bool {
        self.status != DocumentStatus::Ready
    }

    /// Placeholder document for an error
    pub fn from_error(error: &AssemblyError) -> Self {
        match error {
            AssemblyError::MissingEntry(err) => Self {
                html: diagnostic_document("No entry file", &err.to_string()),
                status: DocumentStatus::MissingEntry,
            },
            other => Self {
                html: diagnostic_document("Preview Error", &other.to_string()),
                status: DocumentStatus::Failed,
            },
        }
    }
}

/// Assemble the preview document for `mode` from `files`
pub fn assemble(
    mode: Mode,
    files: &FileSet,
    options: &AssembleOptions,
) -> Result<AssembledDocument, AssemblyError> {
    let resolved = resolve(mode, files)?;

    let html = match resolved {
        ResolvedEntry::Html {
            markup,
            stylesheet,
            script,
        } => assemble_html(markup, stylesheet, script, options)?,

        ResolvedEntry::React { entry, stylesheet } => {
            ensure_embeddable(entry, "script")?;
            ensure_optional_embeddable(stylesheet, "style")?;
            let component = react_component(entry);
            react_document(&entry.content, &component, stylesheet, options)
        }

        ResolvedEntry::Nextjs {
            page, stylesheet, ..
        } => {
            ensure_embeddable(page, "script")?;
            ensure_optional_embeddable(stylesheet, "style")?;
            let normalized = normalize_page(&page.content);
            react_document(&normalized.source, &normalized.component, stylesheet, options)
        }

        ResolvedEntry::Vue { entry, stylesheet } => {
            ensure_embeddable(entry, "script")?;
            ensure_optional_embeddable(stylesheet, "style")?;
            vue_document(&entry.content, stylesheet, options)
        }
    };

    tracing::debug!("Assembled {} document ({} bytes)", mode, html.len());

    Ok(AssembledDocument {
        html,
        status: DocumentStatus::Ready,
    })
}

/// Like [`assemble`], but every failure becomes a diagnostic document
pub fn assemble_or_diagnostic(
    mode: Mode,
    files: &FileSet,
    options: &AssembleOptions,
) -> AssembledDocument {
    match assemble(mode, files, options) {
        Ok(document) => document,
        Err(err) => {
            tracing::warn!("Assembly failed for {} mode: {}", mode, err);
            AssembledDocument::from_error(&err)
        }
    }
}

/// Diagnostic document for a mode name that did not parse
pub fn unsupported_mode_document(name: &str) -> AssembledDocument {
    AssembledDocument::from_error(&AssemblyError::UnsupportedMode(name.to_string()))
}

/// A source embedded in a `<tag>` block must not contain `</tag`, or it
/// would end the block early.
pub(crate) fn ensure_embeddable(file: &SourceFile, tag: &'static str) -> Result<(), AssemblyError> {
    let closing = format!("</{}", tag);
    if file.content.to_ascii_lowercase().contains(&closing) {
        return Err(AssemblyError::UnterminatedBlock {
            path: file.path.clone(),
            tag,
        });
    }
    Ok(())
}

fn ensure_optional_embeddable(
    file: Option<&SourceFile>,
    tag: &'static str,
) -> Result<(), AssemblyError> {
    match file {
        Some(file) => ensure_embeddable(file, tag),
        None => Ok(()),
    }
}
