use codenano_common::{FileSet, SourceFile};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("Failed to create watcher: {0}")]
    CreateError(#[from] notify::Error),

    #[error("Failed to read source directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WatcherResult<T> = Result<T, WatcherError>;

/// Directories never loaded into a file set
const IGNORED_DIRS: &[&str] = &["node_modules", "target", "dist"];

pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    root: PathBuf,
}

impl FileWatcher {
    pub fn new(path: PathBuf) -> WatcherResult<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        watcher.watch(&path, RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            root: path,
        })
    }

    pub fn next_event(&self) -> Option<Event> {
        match self.receiver.recv() {
            Ok(Ok(event)) => Some(event),
            _ => None,
        }
    }

    pub fn try_next_event(&self) -> Option<Event> {
        match self.receiver.try_recv() {
            Ok(Ok(event)) => Some(event),
            _ => None,
        }
    }

    /// Block until a change to a loadable source file happens, then
    /// swallow the burst of events that usually follows a single save.
    /// Returns `None` once the watcher has shut down.
    pub fn next_change(&self, settle: Duration) -> Option<Vec<PathBuf>> {
        loop {
            let event = self.next_event()?;
            let mut changed = self.relevant_paths(&event);
            if changed.is_empty() {
                continue;
            }

            std::thread::sleep(settle);
            while let Some(event) = self.try_next_event() {
                changed.extend(self.relevant_paths(&event));
            }
            changed.sort();
            changed.dedup();
            return Some(changed);
        }
    }

    fn relevant_paths(&self, event: &Event) -> Vec<PathBuf> {
        if !matches!(
            event.kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return Vec::new();
        }

        event
            .paths
            .iter()
            .filter(|path| {
                path.strip_prefix(&self.root)
                    .map(|relative| !relative.components().any(|c| is_ignored_name(&c.as_os_str().to_string_lossy())))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

fn is_ignored_name(name: &str) -> bool {
    name.starts_with('.') || IGNORED_DIRS.contains(&name)
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry.depth() > 0 && is_ignored_name(&entry.file_name().to_string_lossy())
}

/// Load every text file under `root` into a file set. Paths are relative to
/// `root` with `/` separators, in file name order.
pub fn load_directory(root: &Path) -> WatcherResult<FileSet> {
    let mut files = FileSet::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) => relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => continue,
        };

        let content = match std::fs::read(entry.path()) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(content) => content,
                Err(_) => {
                    tracing::debug!("Skipping binary file {}", relative);
                    continue;
                }
            },
            Err(err) => return Err(err.into()),
        };

        files.upsert(SourceFile::from_path(relative, content));
    }

    tracing::debug!("Loaded {} files from {:?}", files.len(), root);
    Ok(files)
}
