//! The playground session served by the host: one edit session feeding one
//! preview.

use crate::store::Project;
use codenano_assembler::AssembleOptions;
use codenano_common::{FileSet, Mode, UnknownMode};
use codenano_editor::{EditSession, EditorError, SessionSnapshot};
use codenano_preview::{
    ConsoleMessage, DeviceMode, Generation, LoadOutcome, ModeSelection, Preview, RenderFrame,
    RenderState,
};
use serde::Serialize;

pub struct PlaygroundState {
    session: EditSession,
    preview: Preview,
    project_id: Option<String>,
}

/// What `GET /api/state` returns
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub mode: String,
    pub files: FileSet,
    pub session: SessionSnapshot,
    pub render: RenderState,
    pub device: DeviceMode,
    pub console: Vec<ConsoleMessage>,
    pub project_id: Option<String>,
}

impl PlaygroundState {
    pub fn new(files: FileSet, mode: Mode, options: AssembleOptions) -> Self {
        let mut preview = Preview::new(options);
        preview.set_mode(mode);
        Self {
            session: EditSession::new(files),
            preview,
            project_id: None,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn preview_mut(&mut self) -> &mut Preview {
        &mut self.preview
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Name of the selected mode, as typed if it did not parse
    pub fn mode_name(&self) -> String {
        match self.preview.mode() {
            ModeSelection::Known(mode) => mode.to_string(),
            ModeSelection::Unsupported(name) => name.clone(),
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self.preview.mode() {
            ModeSelection::Known(mode) => Some(*mode),
            ModeSelection::Unsupported(_) => None,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.preview.set_mode(mode);
    }

    pub fn set_mode_name(&mut self, name: &str) -> Result<Mode, UnknownMode> {
        self.preview.set_mode_name(name)
    }

    pub fn replace_files(&mut self, files: FileSet) {
        self.session.replace_files(files);
    }

    /// Write `content` to `path`, creating the file when it does not exist
    pub fn write_file(&mut self, path: &str, content: String) -> Result<(), EditorError> {
        if !self.session.files().contains(path) {
            self.session.create_file(path)?;
        }
        self.session.set_content(path, content)
    }

    pub fn load_project(&mut self, project: Project) {
        tracing::info!("Loaded project {} ({} mode)", project.id, project.mode);
        self.session.replace_files(project.files);
        self.preview.set_mode(project.mode);
        self.project_id = Some(project.id);
    }

    pub fn set_project_id(&mut self, id: impl Into<String>) {
        self.project_id = Some(id.into());
    }

    /// Render the session's current files
    pub fn render(&mut self) -> RenderFrame {
        self.preview.set_files(self.session.files().clone());
        self.preview.render()
    }

    pub fn refresh(&mut self) -> Option<RenderFrame> {
        self.preview.refresh()
    }

    pub fn set_device_mode(&mut self, device: DeviceMode) -> bool {
        self.preview.set_device_mode(device)
    }

    pub fn handle_load(&mut self, generation: Generation) -> LoadOutcome {
        self.preview.handle_load(generation)
    }

    pub fn handle_message(&mut self, raw: &str) -> Option<ConsoleMessage> {
        self.preview.handle_message(raw)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            mode: self.mode_name(),
            files: self.session.files().clone(),
            session: self.session.snapshot(),
            render: self.preview.state(),
            device: self.preview.device_mode(),
            console: self.preview.console().history().cloned().collect(),
            project_id: self.project_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenano_common::SourceFile;

    fn state() -> PlaygroundState {
        let files = FileSet::from_files(vec![SourceFile::from_path("index.html", "<p>one</p>")]).unwrap();
        PlaygroundState::new(files, Mode::Html, AssembleOptions::standalone())
    }

    #[test]
    fn test_render_uses_latest_edits() {
        let mut state = state();
        state.write_file("index.html", "<p>two</p>".to_string()).unwrap();

        let frame = state.render();
        assert_eq!(frame.document, "<p>two</p>");
    }

    #[test]
    fn test_write_file_creates_missing_files() {
        let mut state = state();
        state.write_file("style.css", "p{}".to_string()).unwrap();
        assert!(state.session().files().contains("style.css"));
    }

    #[test]
    fn test_unknown_mode_name_is_reported() {
        let mut state = state();
        assert!(state.set_mode_name("angular").is_err());
        assert_eq!(state.mode_name(), "angular");
        assert_eq!(state.mode(), None);
    }

    #[test]
    fn test_snapshot() {
        let mut state = state();
        state.render();
        let snapshot = state.snapshot();

        assert_eq!(snapshot.mode, "html");
        assert_eq!(snapshot.files.len(), 1);
        assert!(matches!(snapshot.render, RenderState::Loading { .. }));
    }
}
