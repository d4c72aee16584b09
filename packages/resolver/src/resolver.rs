/// Entry-file resolution
///
/// Each preview mode knows which files make up its entry point. Resolution
/// looks only at names and languages, never at content, so it is pure: the
/// same file set always resolves to the same entries or the same
/// missing-entry signal.
use codenano_common::{FileSet, Language, Mode, SourceFile};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No entry file for {mode} mode (expected {expected})")]
    MissingEntry { mode: Mode, expected: &'static str },
}

/// Files selected for a mode, borrowed from the file set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedEntry<'a> {
    Html {
        markup: Option<&'a SourceFile>,
        stylesheet: Option<&'a SourceFile>,
        script: Option<&'a SourceFile>,
    },
    React {
        entry: &'a SourceFile,
        stylesheet: Option<&'a SourceFile>,
    },
    Vue {
        entry: &'a SourceFile,
        stylesheet: Option<&'a SourceFile>,
    },
    Nextjs {
        page: &'a SourceFile,
        /// Resolved but not used by the assembler: previews are page-only
        layout: Option<&'a SourceFile>,
        stylesheet: Option<&'a SourceFile>,
    },
}

impl ResolvedEntry<'_> {
    pub fn mode(&self) -> Mode {
        match self {
            ResolvedEntry::Html { .. } => Mode::Html,
            ResolvedEntry::React { .. } => Mode::React,
            ResolvedEntry::Vue { .. } => Mode::Vue,
            ResolvedEntry::Nextjs { .. } => Mode::Nextjs,
        }
    }
}

/// Locates the entry files for one mode
pub trait ModeResolver: Send + Sync {
    fn mode(&self) -> Mode;

    fn resolve<'a>(&self, files: &'a FileSet) -> Result<ResolvedEntry<'a>, ResolveError>;
}

pub struct HtmlResolver;
pub struct ReactResolver;
pub struct VueResolver;
pub struct NextjsResolver;

const REACT_ENTRY_NAMES: &[&str] = &["App.jsx", "App.tsx", "App.js"];
const VUE_ENTRY_NAMES: &[&str] = &["App.vue"];
const NEXT_PAGE_NAMES: &[&str] = &["page.js", "page.jsx", "page.tsx"];
const NEXT_LAYOUT_NAMES: &[&str] = &["layout.js", "layout.jsx", "layout.tsx"];

impl ModeResolver for HtmlResolver {
    fn mode(&self) -> Mode {
        Mode::Html
    }

    fn resolve<'a>(&self, files: &'a FileSet) -> Result<ResolvedEntry<'a>, ResolveError> {
        Ok(ResolvedEntry::Html {
            markup: first_of(files, Language::Html, ".html"),
            stylesheet: find_stylesheet(files),
            script: first_of(files, Language::Javascript, ".js"),
        })
    }
}

impl ModeResolver for ReactResolver {
    fn mode(&self) -> Mode {
        Mode::React
    }

    fn resolve<'a>(&self, files: &'a FileSet) -> Result<ResolvedEntry<'a>, ResolveError> {
        let entry = named(files, REACT_ENTRY_NAMES)
            .or_else(|| files.find(|f| f.language == Language::Jsx))
            .ok_or(ResolveError::MissingEntry {
                mode: Mode::React,
                expected: "App.jsx or a .jsx file",
            })?;

        Ok(ResolvedEntry::React {
            entry,
            stylesheet: find_stylesheet(files),
        })
    }
}

impl ModeResolver for VueResolver {
    fn mode(&self) -> Mode {
        Mode::Vue
    }

    fn resolve<'a>(&self, files: &'a FileSet) -> Result<ResolvedEntry<'a>, ResolveError> {
        let entry = named(files, VUE_ENTRY_NAMES)
            .or_else(|| files.find(|f| f.language == Language::Vue))
            .ok_or(ResolveError::MissingEntry {
                mode: Mode::Vue,
                expected: "App.vue or a .vue file",
            })?;

        Ok(ResolvedEntry::Vue {
            entry,
            stylesheet: find_stylesheet(files),
        })
    }
}

impl ModeResolver for NextjsResolver {
    fn mode(&self) -> Mode {
        Mode::Nextjs
    }

    fn resolve<'a>(&self, files: &'a FileSet) -> Result<ResolvedEntry<'a>, ResolveError> {
        let page = named(files, NEXT_PAGE_NAMES).ok_or(ResolveError::MissingEntry {
            mode: Mode::Nextjs,
            expected: "page.js or page.jsx",
        })?;
        let layout = named(files, NEXT_LAYOUT_NAMES);

        if let Some(layout) = layout {
            tracing::debug!(
                "Layout file {} resolved; previews render the page only",
                layout.path
            );
        }

        Ok(ResolvedEntry::Nextjs {
            page,
            layout,
            stylesheet: find_stylesheet(files),
        })
    }
}

/// The resolver responsible for a mode
pub fn resolver_for(mode: Mode) -> &'static dyn ModeResolver {
    match mode {
        Mode::Html => &HtmlResolver,
        Mode::React => &ReactResolver,
        Mode::Vue => &VueResolver,
        Mode::Nextjs => &NextjsResolver,
    }
}

/// Resolve the entry files of `files` for `mode`
pub fn resolve(mode: Mode, files: &FileSet) -> Result<ResolvedEntry<'_>, ResolveError> {
    resolver_for(mode).resolve(files)
}

fn first_of<'a>(files: &'a FileSet, language: Language, extension: &str) -> Option<&'a SourceFile> {
    files.find(|f| f.language == language || f.has_extension(extension))
}

fn find_stylesheet(files: &FileSet) -> Option<&SourceFile> {
    first_of(files, Language::Css, ".css")
}

/// First file whose name matches one of `names`, honoring the order of `names`
fn named<'a>(files: &'a FileSet, names: &[&str]) -> Option<&'a SourceFile> {
    names
        .iter()
        .find_map(|name| files.find(|f| f.name == *name))
}
