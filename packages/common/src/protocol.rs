//! # Console Bridge wire contract
//!
//! The sandbox posts `{ "type": "console-<kind>", "content": "<text>" }` to its
//! parent. These strings are a compatibility contract with previews that are
//! already deployed, so they must stay bit-exact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four console entry points relayed out of the sandbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    Log,
    Error,
    Warn,
    Info,
}

impl ConsoleKind {
    pub const ALL: [ConsoleKind; 4] = [
        ConsoleKind::Log,
        ConsoleKind::Error,
        ConsoleKind::Warn,
        ConsoleKind::Info,
    ];

    /// Name of the `console` method inside the sandbox
    pub fn method(&self) -> &'static str {
        match self {
            ConsoleKind::Log => "log",
            ConsoleKind::Error => "error",
            ConsoleKind::Warn => "warn",
            ConsoleKind::Info => "info",
        }
    }

    /// Value of the wire `type` field
    pub fn message_type(&self) -> &'static str {
        match self {
            ConsoleKind::Log => "console-log",
            ConsoleKind::Error => "console-error",
            ConsoleKind::Warn => "console-warn",
            ConsoleKind::Info => "console-info",
        }
    }

    pub fn from_message_type(message_type: &str) -> Option<Self> {
        ConsoleKind::ALL
            .into_iter()
            .find(|kind| kind.message_type() == message_type)
    }
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}

/// A message exactly as it crosses the isolation boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub content: String,
}

impl BridgeMessage {
    pub fn new(kind: ConsoleKind, content: impl Into<String>) -> Self {
        Self {
            message_type: kind.message_type().to_string(),
            content: content.into(),
        }
    }

    /// Parse a raw message, returning `None` for anything that is not a
    /// console relay. Unrelated message shapes are not an error.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(raw).ok()?;
        Self::from_value(value)
    }

    /// Same as [`BridgeMessage::parse`] for an already-decoded JSON value.
    /// Only objects qualify; serde would otherwise accept a `[type, content]`
    /// array for this struct.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let message: BridgeMessage = serde_json::from_value(value).ok()?;
        message.kind().map(|_| message)
    }

    pub fn kind(&self) -> Option<ConsoleKind> {
        ConsoleKind::from_message_type(&self.message_type)
    }
}
