use serde::{Deserialize, Serialize};

/// Pinned runtime builds loaded by generated framework documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CdnUrls {
    pub react: String,
    pub react_dom: String,
    pub babel: String,
    pub vue: String,
}

impl Default for CdnUrls {
    fn default() -> Self {
        Self {
            react: "https://unpkg.com/react@18.2.0/umd/react.development.js".to_string(),
            react_dom: "https://unpkg.com/react-dom@18.2.0/umd/react-dom.development.js"
                .to_string(),
            babel: "https://unpkg.com/@babel/standalone@7.23.5/babel.min.js".to_string(),
            vue: "https://unpkg.com/vue@3.3.4/dist/vue.global.js".to_string(),
        }
    }
}

/// Settings for the console bridge bootstrap script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOptions {
    /// `postMessage` target origin. `"*"` broadcasts to any parent.
    pub target_origin: String,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            target_origin: "*".to_string(),
        }
    }
}

/// Options for document assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
    pub cdn: CdnUrls,
    /// Inject the console bridge. `None` produces a standalone document.
    pub bridge: Option<BridgeOptions>,
    /// `<title>` of generated framework documents
    pub title: String,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            cdn: CdnUrls::default(),
            bridge: Some(BridgeOptions::default()),
            title: "CodeNANO Preview".to_string(),
        }
    }
}

impl AssembleOptions {
    pub fn standalone() -> Self {
        Self {
            bridge: None,
            ..Default::default()
        }
    }

    pub fn with_target_origin(mut self, origin: impl Into<String>) -> Self {
        self.bridge = Some(BridgeOptions {
            target_origin: origin.into(),
        });
        self
    }
}
