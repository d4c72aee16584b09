//! # CodeNANO preview
//!
//! Host-side half of the live preview: the sandbox renderer state machine,
//! the receiving end of the console bridge, and the [`Preview`] facade that
//! ties them to the document assembler.

pub mod bridge;
mod preview;
pub mod renderer;
pub mod sandbox;

pub use bridge::{ConsoleBridge, ConsoleHandler, ConsoleMessage, DEFAULT_HISTORY};
pub use preview::{ModeSelection, Preview};
pub use renderer::{Generation, LoadOutcome, RenderFrame, RenderState, SandboxRenderer};
pub use sandbox::{sandbox_attribute, DeviceMode, UnknownDevice, SANDBOX_TOKENS};
