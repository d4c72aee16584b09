use codenano_assembler::{assemble, AssembleOptions};
use codenano_common::{FileSet, Mode};
use codenano_preview::{DeviceMode, Generation, LoadOutcome, Preview};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| to_js_error("Serialization error", e))
}

/// In-page preview engine. Everything crosses the boundary as JSON strings.
#[wasm_bindgen]
pub struct PreviewEngine {
    preview: Preview,
}

#[wasm_bindgen]
impl PreviewEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PreviewEngine {
        PreviewEngine {
            preview: Preview::new(AssembleOptions::default()),
        }
    }

    /// Replace the file set with a JSON array of source files
    #[wasm_bindgen(js_name = setFiles)]
    pub fn set_files(&mut self, files_json: &str) -> Result<(), JsValue> {
        let files: FileSet =
            serde_json::from_str(files_json).map_err(|e| to_js_error("Invalid files", e))?;
        self.preview.set_files(files);
        Ok(())
    }

    /// Returns false when the name is not a known mode
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, name: &str) -> bool {
        self.preview.set_mode_name(name).is_ok()
    }

    /// Render the current files and return the frame as JSON
    pub fn render(&mut self) -> Result<String, JsValue> {
        to_json(&self.preview.render())
    }

    /// Re-issue the last document. Returns undefined when nothing was rendered yet.
    pub fn refresh(&mut self) -> Result<Option<String>, JsValue> {
        self.preview.refresh().as_ref().map(to_json).transpose()
    }

    #[wasm_bindgen(js_name = setDeviceMode)]
    pub fn set_device_mode(&mut self, device: &str) -> Result<bool, JsValue> {
        let device: DeviceMode = device
            .parse()
            .map_err(|e| to_js_error("Invalid device", e))?;
        Ok(self.preview.set_device_mode(device))
    }

    /// Report a finished sandbox load; returns "accepted", "stale" or "unknown"
    #[wasm_bindgen(js_name = handleLoad)]
    pub fn handle_load(&mut self, generation: u64) -> String {
        match self.preview.handle_load(Generation(generation)) {
            LoadOutcome::Accepted => "accepted",
            LoadOutcome::Stale => "stale",
            LoadOutcome::Unknown => "unknown",
        }
        .to_string()
    }

    /// Feed a message posted by the sandbox. Returns the recorded console
    /// message as JSON, or undefined if the message was not a console message.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&mut self, raw: &str) -> Result<Option<String>, JsValue> {
        self.preview.handle_message(raw).as_ref().map(to_json).transpose()
    }

    #[wasm_bindgen(js_name = renderState)]
    pub fn render_state(&self) -> Result<String, JsValue> {
        to_json(&self.preview.state())
    }

    /// Take every console message recorded since the last drain
    #[wasm_bindgen(js_name = drainConsole)]
    pub fn drain_console(&mut self) -> Result<String, JsValue> {
        to_json(&self.preview.console_mut().drain())
    }

    pub fn teardown(&mut self) {
        self.preview.teardown();
    }
}

impl Default for PreviewEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot assembly without render bookkeeping
#[wasm_bindgen(js_name = assembleDocument)]
pub fn assemble_document(mode: &str, files_json: &str) -> Result<String, JsValue> {
    let mode: Mode = mode.parse().map_err(|e| to_js_error("Unknown mode", e))?;
    let files: FileSet =
        serde_json::from_str(files_json).map_err(|e| to_js_error("Invalid files", e))?;

    assemble(mode, &files, &AssembleOptions::default())
        .map(|document| document.into_string())
        .map_err(|e| to_js_error("Assembly error", e))
}
