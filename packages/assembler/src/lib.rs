//! # Document Assembler
//!
//! Turns a `(Mode, FileSet)` pair into a single self-contained markup
//! document that can run inside an isolated browser context.
//!
//! Assembly is synchronous string construction and deterministic: the same
//! inputs always produce byte-identical output. [`assemble`] reports failures
//! as [`AssemblyError`]; [`assemble_or_diagnostic`] never fails and renders
//! every error as a readable placeholder document.

mod assembler;
pub mod bridge;
mod diagnostic;
mod framework;
pub mod html;
pub mod nextjs;
mod options;
mod writer;

pub use assembler::{
    assemble, assemble_or_diagnostic, unsupported_mode_document, AssembledDocument,
    AssemblyError, DocumentStatus,
};
pub use bridge::{bootstrap_script, bootstrap_tag, BRIDGE_MARKER};
pub use diagnostic::{diagnostic_document, escape_html};
pub use options::{AssembleOptions, BridgeOptions, CdnUrls};
