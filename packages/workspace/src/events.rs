//! Messages exchanged with the host page over `/ws`

use codenano_common::ConsoleKind;
use codenano_preview::{ConsoleMessage, DeviceMode, Generation, RenderFrame};
use serde::{Deserialize, Serialize};

/// Server → host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerEvent {
    Render {
        generation: Generation,
        #[serde(rename = "sandboxKey")]
        sandbox_key: u64,
        document: String,
        device: DeviceMode,
    },
    Device {
        device: DeviceMode,
        width: Option<u32>,
        height: Option<u32>,
    },
    Console {
        kind: ConsoleKind,
        content: String,
        sequence: u64,
    },
}

/// Name of the `<meta>` tag carrying the generation of a sent document
pub const GENERATION_META: &str = "codenano-generation";

impl From<RenderFrame> for ServerEvent {
    fn from(frame: RenderFrame) -> Self {
        ServerEvent::Render {
            generation: frame.generation,
            sandbox_key: frame.sandbox_key,
            document: stamp_generation(&frame.document, frame.generation),
            device: frame.device,
        }
    }
}

/// Embed `generation` in the document itself. The host reads it back from
/// whichever document finished loading, so a late load of a superseded
/// document reports its own generation.
pub fn stamp_generation(document: &str, generation: Generation) -> String {
    let tag = format!("<meta name=\"{}\" content=\"{}\">", GENERATION_META, generation.0);
    match end_of_head_tag(document) {
        Some(index) => format!("{}{}{}", &document[..index], tag, &document[index..]),
        None => format!("{}{}", document, tag),
    }
}

fn end_of_head_tag(document: &str) -> Option<usize> {
    let lower = document.to_ascii_lowercase();
    let mut from = 0;

    while let Some(found) = lower[from..].find("<head") {
        let after = from + found + "<head".len();
        match lower.as_bytes().get(after) {
            Some(b'>') => return Some(after + 1),
            Some(c) if c.is_ascii_whitespace() => {
                return lower[after..].find('>').map(|close| after + close + 1);
            }
            Some(_) => from = after,
            None => return None,
        }
    }

    None
}

impl From<DeviceMode> for ServerEvent {
    fn from(device: DeviceMode) -> Self {
        let (width, height) = match device.dimensions() {
            Some((width, height)) => (Some(width), Some(height)),
            None => (None, None),
        };
        ServerEvent::Device {
            device,
            width,
            height,
        }
    }
}

impl From<&ConsoleMessage> for ServerEvent {
    fn from(message: &ConsoleMessage) -> Self {
        ServerEvent::Console {
            kind: message.kind,
            content: message.content.clone(),
            sequence: message.sequence,
        }
    }
}

/// Host → server, besides the raw console messages forwarded from the
/// sandbox
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostMessage {
    /// The sandbox fired its load event for `generation`
    Loaded { generation: Generation },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_event_shape() {
        let json = serde_json::to_value(ServerEvent::from(DeviceMode::Mobile)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "device", "device": "mobile", "width": 375, "height": 667 })
        );

        let json = serde_json::to_value(ServerEvent::from(DeviceMode::Desktop)).unwrap();
        assert_eq!(json["width"], serde_json::Value::Null);
    }

    #[test]
    fn test_render_event_shape() {
        let event = ServerEvent::Render {
            generation: Generation(3),
            sandbox_key: 1,
            document: "<p/>".to_string(),
            device: DeviceMode::Desktop,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["type"], "render");
        assert_eq!(json["generation"], 3);
        assert_eq!(json["sandboxKey"], 1);
    }

    #[test]
    fn test_render_event_stamps_generation() {
        let frame = RenderFrame {
            generation: Generation(7),
            sandbox_key: 2,
            document: "<html><header></header><HEAD lang=\"en\"><title>x</title></HEAD></html>".to_string(),
            device: DeviceMode::Desktop,
        };

        match ServerEvent::from(frame) {
            ServerEvent::Render { document, .. } => assert_eq!(
                document,
                "<html><header></header><HEAD lang=\"en\"><meta name=\"codenano-generation\" content=\"7\"><title>x</title></HEAD></html>"
            ),
            other => panic!("Expected render event, got {:?}", other),
        }
    }

    #[test]
    fn test_stamp_without_head_appends() {
        let stamped = stamp_generation("<p>hi</p>", Generation(1));
        assert_eq!(stamped, "<p>hi</p><meta name=\"codenano-generation\" content=\"1\">");
    }

    #[test]
    fn test_parse_loaded() {
        let message: HostMessage =
            serde_json::from_str(r#"{"type":"loaded","generation":4}"#).unwrap();
        assert_eq!(
            message,
            HostMessage::Loaded {
                generation: Generation(4)
            }
        );
    }
}
