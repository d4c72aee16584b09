use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use codenano_common::FileSetError;
use codenano_editor::EditorError;
use codenano_preview::UnknownDevice;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Device(#[from] UnknownDevice),

    #[error("Cannot save a project in unsupported mode '{0}'")]
    UnsupportedMode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ServerError::Store(StoreError::InvalidId { .. }) => StatusCode::BAD_REQUEST,
            ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Editor(EditorError::FileSet(FileSetError::NotFound { .. })) => {
                StatusCode::NOT_FOUND
            }
            ServerError::Editor(EditorError::FileSet(FileSetError::DuplicatePath { .. })) => {
                StatusCode::CONFLICT
            }
            ServerError::Editor(_) => StatusCode::BAD_REQUEST,
            ServerError::Device(_) | ServerError::UnsupportedMode(_) => StatusCode::BAD_REQUEST,
            ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
