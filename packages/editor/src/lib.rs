//! # CodeNANO Editor
//!
//! Tabbed multi-file text editing on top of the [`FileSet`].
//!
//! The editor is deliberately plain: a text buffer per file, a gutter of
//! line numbers, and literal tab insertion. Every change is written straight
//! through to the file set so the next render sees it.
//!
//! ```rust,ignore
//! use codenano_editor::EditSession;
//!
//! let mut session = EditSession::new(files);
//! session.open("app.js")?;
//! session.set_content("app.js", "console.log(1)".to_string())?;
//! let cursor = session.insert_tab("app.js", 0)?;
//! ```
//!
//! [`FileSet`]: codenano_common::FileSet

mod errors;
mod session;
pub mod text;

pub use errors::EditorError;
pub use session::{EditSession, SessionSnapshot};
