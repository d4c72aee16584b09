//! Error types for the editor

use codenano_common::FileSetError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    FileSet(#[from] FileSetError),

    #[error("File is not open: {path}")]
    NotOpen { path: String },

    #[error("Invalid file name: '{name}'")]
    InvalidName { name: String },
}
