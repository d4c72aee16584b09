use crate::bridge::{ConsoleBridge, ConsoleMessage};
use crate::renderer::{Generation, LoadOutcome, RenderFrame, RenderState, SandboxRenderer};
use crate::sandbox::DeviceMode;
use codenano_assembler::{
    assemble_or_diagnostic, unsupported_mode_document, AssembleOptions, AssembledDocument,
    DocumentStatus,
};
use codenano_common::{FileSet, Mode, UnknownMode};

/// The mode currently selected by the host. A name that does not parse is
/// kept so the preview can say what was asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeSelection {
    Known(Mode),
    Unsupported(String),
}

impl Default for ModeSelection {
    fn default() -> Self {
        ModeSelection::Known(Mode::default())
    }
}

/// Host-facing preview: files and mode in, render frames and console
/// messages out.
#[derive(Debug, Default)]
pub struct Preview {
    files: FileSet,
    mode: ModeSelection,
    options: AssembleOptions,
    renderer: SandboxRenderer,
    bridge: ConsoleBridge,
}

impl Preview {
    pub fn new(options: AssembleOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn set_files(&mut self, files: FileSet) {
        self.files = files;
    }

    pub fn files(&self) -> &FileSet {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut FileSet {
        &mut self.files
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = ModeSelection::Known(mode);
    }

    /// Select a mode by name. An unknown name is still selected and renders
    /// an "Unsupported mode" document.
    pub fn set_mode_name(&mut self, name: &str) -> Result<Mode, UnknownMode> {
        match name.parse::<Mode>() {
            Ok(mode) => {
                self.set_mode(mode);
                Ok(mode)
            }
            Err(err) => {
                tracing::warn!("Unsupported mode '{}'", name);
                self.mode = ModeSelection::Unsupported(name.to_string());
                Err(err)
            }
        }
    }

    pub fn mode(&self) -> &ModeSelection {
        &self.mode
    }

    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// Build the document for the current files and mode and hand it to the
    /// renderer. Never fails: every failure becomes a visible document.
    pub fn render(&mut self) -> RenderFrame {
        self.bridge.clear();

        let document = self.build_document();
        match document.status() {
            DocumentStatus::Failed => self.renderer.render_failed(document.into_string()),
            DocumentStatus::Ready | DocumentStatus::MissingEntry => {
                self.renderer.render(document.into_string())
            }
        }
    }

    /// The document `render` would hand to the sandbox
    pub fn build_document(&self) -> AssembledDocument {
        match &self.mode {
            ModeSelection::Known(mode) => assemble_or_diagnostic(*mode, &self.files, &self.options),
            ModeSelection::Unsupported(name) => unsupported_mode_document(name),
        }
    }

    pub fn refresh(&mut self) -> Option<RenderFrame> {
        self.bridge.clear();
        self.renderer.refresh()
    }

    /// Returns whether the device mode changed
    pub fn set_device_mode(&mut self, device: DeviceMode) -> bool {
        self.renderer.set_device_mode(device)
    }

    pub fn device_mode(&self) -> DeviceMode {
        self.renderer.device_mode()
    }

    pub fn on_console_message<F>(&mut self, handler: F)
    where
        F: FnMut(&ConsoleMessage) + Send + 'static,
    {
        self.bridge.on_message(handler);
    }

    /// The sandbox reported that generation `generation` finished loading
    pub fn handle_load(&mut self, generation: Generation) -> LoadOutcome {
        self.renderer.complete(generation)
    }

    /// A raw message posted by the sandbox
    pub fn handle_message(&mut self, raw: &str) -> Option<ConsoleMessage> {
        self.bridge.receive(raw)
    }

    pub fn state(&self) -> RenderState {
        self.renderer.state()
    }

    pub fn current_frame(&self) -> Option<RenderFrame> {
        self.renderer.current_frame()
    }

    pub fn console(&self) -> &ConsoleBridge {
        &self.bridge
    }

    pub fn console_mut(&mut self) -> &mut ConsoleBridge {
        &mut self.bridge
    }

    pub fn teardown(&mut self) {
        self.renderer.teardown();
        self.bridge.clear();
    }
}
