use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Presentation size of the sandbox surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    /// Fills the host surface
    #[default]
    Desktop,

    /// 768x1024 (iPad)
    Tablet,

    /// 375x667 (iPhone SE)
    Mobile,
}

impl DeviceMode {
    /// Fixed frame size, or `None` when the frame fills its container
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            DeviceMode::Desktop => None,
            DeviceMode::Tablet => Some((768, 1024)),
            DeviceMode::Mobile => Some((375, 667)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceMode::Desktop => "desktop",
            DeviceMode::Tablet => "tablet",
            DeviceMode::Mobile => "mobile",
        }
    }
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown device mode '{0}' (expected desktop, tablet or mobile)")]
pub struct UnknownDevice(pub String);

impl FromStr for DeviceMode {
    type Err = UnknownDevice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(DeviceMode::Desktop),
            "tablet" => Ok(DeviceMode::Tablet),
            "mobile" => Ok(DeviceMode::Mobile),
            _ => Err(UnknownDevice(s.to_string())),
        }
    }
}

/// Capabilities granted to the isolated surface.
///
/// Scripts run, and the frame is same-origin so the host can read runtime
/// errors out of it. Top-level navigation and escaping popups are never
/// granted.
pub const SANDBOX_TOKENS: &[&str] = &[
    "allow-scripts",
    "allow-same-origin",
    "allow-modals",
    "allow-forms",
];

const FORBIDDEN_TOKENS: &[&str] = &[
    "allow-top-navigation",
    "allow-top-navigation-by-user-activation",
    "allow-popups-to-escape-sandbox",
];

/// Value of the iframe `sandbox` attribute. Forbidden tokens are dropped
/// even if they end up in the granted list.
pub fn sandbox_attribute() -> String {
    SANDBOX_TOKENS
        .iter()
        .copied()
        .filter(|token| is_permitted(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_permitted(token: &str) -> bool {
    !FORBIDDEN_TOKENS.contains(&token)
}
