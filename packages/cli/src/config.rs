use anyhow::{anyhow, Result};
use codenano_assembler::{AssembleOptions, BridgeOptions, CdnUrls};
use codenano_common::Mode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "codenano.config.json";

/// CodeNANO configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the project's source files
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Preview mode name (html, react, vue, nextjs)
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Port for `codenano serve`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin the console bridge posts to. Unset means "*".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_origin: Option<String>,

    /// Where saved projects live
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Runtime script URLs for framework modes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn: Option<CdnUrls>,
}

fn default_src_dir() -> String {
    "src".to_string()
}

fn default_mode() -> String {
    Mode::default().to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_store_dir() -> String {
    ".codenano/projects".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Invalid {}: {}", DEFAULT_CONFIG_NAME, e))?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.src_dir)
    }

    pub fn get_store_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.store_dir)
    }

    /// The configured mode, or the override when one is given
    pub fn resolve_mode(&self, flag: Option<&str>) -> Result<Mode> {
        let name = flag.unwrap_or(&self.mode);
        name.parse::<Mode>()
            .map_err(|e| anyhow!("Unknown mode {}", e))
    }

    pub fn assemble_options(&self, bridge: bool) -> AssembleOptions {
        let mut options = AssembleOptions {
            cdn: self.cdn.clone().unwrap_or_default(),
            ..Default::default()
        };

        options.bridge = if bridge {
            Some(match &self.target_origin {
                Some(origin) => BridgeOptions {
                    target_origin: origin.clone(),
                },
                None => BridgeOptions::default(),
            })
        } else {
            None
        };

        options
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            mode: default_mode(),
            port: default_port(),
            target_origin: None,
            store_dir: default_store_dir(),
            cdn: None,
        }
    }
}
