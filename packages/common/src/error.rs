use thiserror::Error;

/// Errors raised by the file set model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileSetError {
    #[error("A file already exists at path: {path}")]
    DuplicatePath { path: String },

    #[error("File not found: {path}")]
    NotFound { path: String },
}
