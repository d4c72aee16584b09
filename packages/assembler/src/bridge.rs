//! # Console bridge bootstrap
//!
//! Script injected as the first script of every preview document. It wraps
//! the sandbox's `console.log/error/warn/info` once, at context start, so each
//! call still reaches the original method and is also posted to the parent as
//! `{ type: "console-<kind>", content }`. It also reports uncaught errors and
//! unhandled promise rejections as `console-error`.
//!
//! The wrapper lives and dies with the sandbox's own `window`; nothing outside
//! the isolated context is patched.

use crate::options::BridgeOptions;
use codenano_common::ConsoleKind;
use serde_json::{Map, Value};

/// Attribute marking the injected bootstrap tag
pub const BRIDGE_MARKER: &str = "data-codenano=\"bridge\"";

/// JavaScript source of the bootstrap
pub fn bootstrap_script(options: &BridgeOptions) -> String {
    let mut kinds = Map::new();
    for kind in ConsoleKind::ALL {
        kinds.insert(
            kind.method().to_string(),
            Value::String(kind.message_type().to_string()),
        );
    }

    let target_origin = js_literal(&Value::String(options.target_origin.clone()));
    let kinds = js_literal(&Value::Object(kinds));

    format!(
        r#"(function () {{
  var targetOrigin = {target_origin};
  var messageTypes = {kinds};
  function format(arg) {{
    if (arg instanceof Error) {{
      return arg.stack || arg.message || String(arg);
    }}
    if (arg !== null && typeof arg === "object") {{
      try {{
        return JSON.stringify(arg, null, 2);
      }} catch (err) {{
        return String(arg);
      }}
    }}
    return String(arg);
  }}
  function relay(type, content) {{
    try {{
      window.parent.postMessage({{ type: type, content: content }}, targetOrigin);
    }} catch (err) {{}}
  }}
  Object.keys(messageTypes).forEach(function (method) {{
    var original = console[method];
    console[method] = function () {{
      var args = Array.prototype.slice.call(arguments);
      if (typeof original === "function") {{
        original.apply(console, args);
      }}
      relay(messageTypes[method], args.map(format).join(" "));
    }};
  }});
  window.addEventListener("error", function (event) {{
    relay(messageTypes.error, event.message + " (" + (event.filename || "inline") + ":" + event.lineno + ")");
  }});
  window.addEventListener("unhandledrejection", function (event) {{
    relay(messageTypes.error, "Unhandled promise rejection: " + format(event.reason));
  }});
}})();"#
    )
}

/// Bootstrap wrapped in its `<script>` tag
pub fn bootstrap_tag(options: &BridgeOptions) -> String {
    format!(
        "<script {}>{}</script>",
        BRIDGE_MARKER,
        bootstrap_script(options)
    )
}

/// JSON is valid JavaScript; `</` is split so the literal cannot close the tag.
fn js_literal(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_all_four_entry_points() {
        let script = bootstrap_script(&BridgeOptions::default());
        for kind in ConsoleKind::ALL {
            assert!(
                script.contains(&format!("\"{}\":\"{}\"", kind.method(), kind.message_type())),
                "missing mapping for {}",
                kind
            );
        }
        assert!(script.contains("original.apply(console, args)"));
        assert!(script.contains("args.map(format).join(\" \")"));
    }

    #[test]
    fn test_serializes_objects_as_structured_text() {
        let script = bootstrap_script(&BridgeOptions::default());
        assert!(script.contains("JSON.stringify(arg, null, 2)"));
        assert!(script.contains("return String(arg);"));
    }

    #[test]
    fn test_installs_error_handlers() {
        let script = bootstrap_script(&BridgeOptions::default());
        assert!(script.contains("addEventListener(\"error\""));
        assert!(script.contains("event.filename"));
        assert!(script.contains("event.lineno"));
        assert!(script.contains("addEventListener(\"unhandledrejection\""));
    }

    #[test]
    fn test_target_origin_defaults_to_broadcast() {
        let script = bootstrap_script(&BridgeOptions::default());
        assert!(script.contains("var targetOrigin = \"*\";"));
    }

    #[test]
    fn test_target_origin_is_scoped_and_escaped() {
        let scoped = bootstrap_script(&BridgeOptions {
            target_origin: "http://localhost:3030".to_string(),
        });
        assert!(scoped.contains("var targetOrigin = \"http://localhost:3030\";"));

        let hostile = bootstrap_script(&BridgeOptions {
            target_origin: "\"</script><script>alert(1)".to_string(),
        });
        assert!(!hostile.contains("</script>"));
    }

    #[test]
    fn test_tag_is_marked() {
        let tag = bootstrap_tag(&BridgeOptions::default());
        assert!(tag.starts_with("<script data-codenano=\"bridge\">"));
        assert!(tag.ends_with("</script>"));
    }
}
