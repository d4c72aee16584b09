//! Plain web mode: inject style, script and the bridge into the user's markup.
//!
//! Injection is positional text insertion. Marker lookup is ASCII
//! case-insensitive; a missing marker skips that injection and leaves the
//! rest of the markup untouched.

use crate::assembler::{ensure_embeddable, AssemblyError};
use crate::bridge::bootstrap_tag;
use crate::options::AssembleOptions;
use codenano_common::SourceFile;

pub const DEFAULT_MARKUP: &str = "<!DOCTYPE html><html><head></head><body></body></html>";

pub(crate) fn assemble_html(
    markup: Option<&SourceFile>,
    stylesheet: Option<&SourceFile>,
    script: Option<&SourceFile>,
    options: &AssembleOptions,
) -> Result<String, AssemblyError> {
    let mut document = markup
        .map(|f| f.content.clone())
        .unwrap_or_else(|| DEFAULT_MARKUP.to_string());

    // Placed on the untouched markup so user sources never host the bridge
    if let Some(bridge) = &options.bridge {
        insert_bootstrap(&mut document, &bootstrap_tag(bridge));
    }

    if let Some(stylesheet) = stylesheet {
        ensure_embeddable(stylesheet, "style")?;
        let block = format!("<style>{}</style>", stylesheet.content);
        if !insert_before_first(&mut document, "</head>", &block) {
            tracing::debug!("No </head> marker, skipping {}", stylesheet.path);
        }
    }

    if let Some(script) = script {
        ensure_embeddable(script, "script")?;
        let block = format!("<script>{}</script>", script.content);
        if !insert_before_last(&mut document, "</body>", &block) {
            tracing::debug!("No </body> marker, skipping {}", script.path);
        }
    }

    Ok(document)
}

/// Insert `block` immediately before the first occurrence of `marker`
pub fn insert_before_first(document: &mut String, marker: &str, block: &str) -> bool {
    match document.to_ascii_lowercase().find(marker) {
        Some(index) => {
            document.insert_str(index, block);
            true
        }
        None => false,
    }
}

/// Insert `block` immediately before the last occurrence of `marker`
pub fn insert_before_last(document: &mut String, marker: &str, block: &str) -> bool {
    match document.to_ascii_lowercase().rfind(marker) {
        Some(index) => {
            document.insert_str(index, block);
            true
        }
        None => false,
    }
}

/// The bridge must run before any user script: right after `<head>`, else
/// after `<html>`, else after the doctype, else at the very start.
fn insert_bootstrap(document: &mut String, tag: &str) {
    let index = end_of_open_tag(document, "head")
        .or_else(|| end_of_open_tag(document, "html"))
        .or_else(|| end_of_open_tag(document, "!doctype"))
        .unwrap_or(0);
    document.insert_str(index, tag);
}

/// Byte offset just past the `>` of the first `<tag ...>` opening tag.
/// `<header>` does not count as `<head>`.
fn end_of_open_tag(document: &str, tag: &str) -> Option<usize> {
    let lower = document.to_ascii_lowercase();
    let needle = format!("<{}", tag);
    let mut from = 0;

    while let Some(found) = lower[from..].find(&needle) {
        let start = from + found;
        let after = start + needle.len();
        match lower[after..].chars().next() {
            Some(c) if c == '>' || c == '/' || c.is_ascii_whitespace() => {
                return lower[after..].find('>').map(|close| after + close + 1);
            }
            Some(_) => from = after,
            None => return None,
        }
    }

    None
}
