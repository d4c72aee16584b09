use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Preview strategy for a project. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Html,
    React,
    Vue,
    Nextjs,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Html, Mode::React, Mode::Vue, Mode::Nextjs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Html => "html",
            Mode::React => "react",
            Mode::Vue => "vue",
            Mode::Nextjs => "nextjs",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' (expected one of: html, react, vue, nextjs)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "web" => Ok(Mode::Html),
            "react" => Ok(Mode::React),
            "vue" => Ok(Mode::Vue),
            "nextjs" | "next" | "next.js" => Ok(Mode::Nextjs),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("html".parse::<Mode>().unwrap(), Mode::Html);
        assert_eq!("React".parse::<Mode>().unwrap(), Mode::React);
        assert_eq!(" vue ".parse::<Mode>().unwrap(), Mode::Vue);
        assert_eq!("next.js".parse::<Mode>().unwrap(), Mode::Nextjs);
        assert_eq!(
            "svelte".parse::<Mode>().unwrap_err(),
            UnknownMode("svelte".to_string())
        );
    }

    #[test]
    fn test_display_round_trips() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
