//! Shared model types for the CodeNANO preview engine.
//!
//! Everything downstream (resolvers, assembler, renderer, editor) speaks in
//! terms of the [`FileSet`] and [`Mode`] defined here. The sandbox wire
//! contract lives in [`protocol`] so the bootstrap script generator and the
//! host-side parser cannot drift apart.

pub mod error;
pub mod file_set;
pub mod mode;
pub mod protocol;
pub mod source_file;

pub use error::*;
pub use file_set::*;
pub use mode::*;
pub use protocol::*;
pub use source_file::*;
