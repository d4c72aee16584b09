//! # CodeNANO workspace
//!
//! Everything needed to host the preview outside a library call: project
//! persistence behind [`ProjectStore`], the playground session, the axum
//! HTTP/WebSocket host with its browser page, and a directory watcher that
//! feeds a source folder into the preview.

pub mod error;
pub mod events;
mod host_page;
pub mod server;
pub mod state;
pub mod store;
pub mod watcher;

pub use error::ServerError;
pub use events::{stamp_generation, HostMessage, ServerEvent, GENERATION_META};
pub use host_page::host_page;
pub use server::{handle_host_message, router, serve, spawn_watcher, AppState, RenderSummary};
pub use state::{PlaygroundState, StateSnapshot};
pub use store::{
    FsProjectStore, MemoryProjectStore, Project, ProjectStore, ProjectSummary, StoreError,
    StoreResult, LOCAL_OWNER,
};
pub use watcher::{load_directory, FileWatcher, WatcherError, WatcherResult};
