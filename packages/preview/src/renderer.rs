//! # Sandbox Renderer
//!
//! Owns one isolated rendering surface and its lifecycle:
//!
//! ```text
//! Idle ──render──▶ Loading(g) ──complete(g)──▶ Ready(g)
//!                      │                           │
//!                      └─────────◀──render─────────┘
//! render_failed ──▶ Error(g)
//! ```
//!
//! Every `render` takes a new, strictly increasing generation id. A load
//! completion only counts if it carries the current generation; anything
//! older is stale and ignored, so a slow load can never mark a newer render
//! as finished. Device-mode changes are presentation only and never start
//! a new generation.

use crate::sandbox::DeviceMode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing render tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RenderState {
    Idle,
    Loading { generation: Generation },
    Ready { generation: Generation },
    Error { generation: Generation },
}

impl RenderState {
    pub fn generation(&self) -> Option<Generation> {
        match self {
            RenderState::Idle => None,
            RenderState::Loading { generation }
            | RenderState::Ready { generation }
            | RenderState::Error { generation } => Some(*generation),
        }
    }
}

/// Result of feeding a load-completion signal to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Completion of the current render
    Accepted,
    /// Completion of a superseded render, ignored
    Stale,
    /// Generation never issued
    Unknown,
}

/// What the host must load into its isolated surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub generation: Generation,
    /// Identity of the surface. A new key means the host must recreate it.
    pub sandbox_key: u64,
    pub document: String,
    pub device: DeviceMode,
}

#[derive(Debug, Clone, Default)]
pub struct SandboxRenderer {
    state: RenderState,
    last_generation: u64,
    sandbox_key: u64,
    device: DeviceMode,
    document: Option<String>,
    failed: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState::Idle
    }
}

impl SandboxRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the sandbox content with `document`
    pub fn render(&mut self, document: String) -> RenderFrame {
        self.load(document, false)
    }

    /// Replace the sandbox content with the diagnostic for a failed build
    pub fn render_failed(&mut self, document: String) -> RenderFrame {
        self.load(document, true)
    }

    /// Re-run the current document in a fresh surface
    pub fn refresh(&mut self) -> Option<RenderFrame> {
        let document = self.document.clone()?;
        self.sandbox_key += 1;
        Some(self.load(document, self.failed))
    }

    /// Feed a load-completion signal
    pub fn complete(&mut self, generation: Generation) -> LoadOutcome {
        match self.state {
            RenderState::Loading { generation: current } if current == generation => {
                self.state = RenderState::Ready { generation };
                tracing::debug!("Render {} ready", generation);
                LoadOutcome::Accepted
            }
            RenderState::Error { generation: current } if current == generation => {
                LoadOutcome::Accepted
            }
            RenderState::Ready { generation: current } if current == generation => {
                // Duplicate signal for a render that already completed
                LoadOutcome::Accepted
            }
            _ if generation.0 != 0 && generation.0 <= self.last_generation => {
                tracing::debug!(
                    "Ignoring stale completion {} (current g{})",
                    generation,
                    self.last_generation
                );
                LoadOutcome::Stale
            }
            _ => {
                tracing::warn!("Completion for unknown render {}", generation);
                LoadOutcome::Unknown
            }
        }
    }

    /// Change presentation size. Returns whether anything changed.
    pub fn set_device_mode(&mut self, device: DeviceMode) -> bool {
        let changed = self.device != device;
        self.device = device;
        changed
    }

    /// Drop the surface content. Generations keep counting, so completions
    /// of torn-down renders stay stale.
    pub fn teardown(&mut self) {
        self.state = RenderState::Idle;
        self.document = None;
        self.failed = false;
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn device_mode(&self) -> DeviceMode {
        self.device
    }

    /// Most recently issued generation, if any
    pub fn generation(&self) -> Option<Generation> {
        (self.last_generation > 0).then_some(Generation(self.last_generation))
    }

    pub fn sandbox_key(&self) -> u64 {
        self.sandbox_key
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// The frame the host should currently display
    pub fn current_frame(&self) -> Option<RenderFrame> {
        let generation = self.state.generation()?;
        let document = self.document.clone()?;
        Some(RenderFrame {
            generation,
            sandbox_key: self.sandbox_key,
            document,
            device: self.device,
        })
    }

    fn load(&mut self, document: String, failed: bool) -> RenderFrame {
        self.last_generation += 1;
        let generation = Generation(self.last_generation);

        self.state = if failed {
            RenderState::Error { generation }
        } else {
            RenderState::Loading { generation }
        };
        self.failed = failed;
        self.document = Some(document.clone());

        tracing::debug!("Render {} started ({} bytes)", generation, document.len());

        RenderFrame {
            generation,
            sandbox_key: self.sandbox_key,
            document,
            device: self.device,
        }
    }
}
