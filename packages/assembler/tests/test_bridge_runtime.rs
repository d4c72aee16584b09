//! Runs the console bridge bootstrap in a JavaScript engine against stub
//! `window` and `console` objects and checks what reaches the parent.

use boa_engine::{Context, Source};
use codenano_assembler::{bootstrap_script, BridgeOptions};
use serde_json::Value;

const PRELUDE: &str = r#"
var posted = [];
var originals = [];
var listeners = {};
var window = {
  parent: {
    postMessage: function (message, origin) {
      posted.push({ type: message.type, content: message.content, origin: origin });
    }
  },
  addEventListener: function (name, handler) {
    listeners[name] = handler;
  }
};
var console = {};
["log", "error", "warn", "info"].forEach(function (method) {
  console[method] = function () {
    originals.push(method);
  };
});
"#;

fn run(options: &BridgeOptions, body: &str) -> Value {
    let code = format!(
        "{}\n{}\n{}\nJSON.stringify({{ posted: posted, originals: originals }});",
        PRELUDE,
        bootstrap_script(options),
        body
    );

    let mut context = Context::default();
    let result = context.eval(Source::from_bytes(code.as_bytes())).unwrap();
    let json = result.to_string(&mut context).unwrap().to_std_string_escaped();
    serde_json::from_str(&json).unwrap()
}

fn posted(output: &Value) -> Vec<(String, String)> {
    output["posted"]
        .as_array()
        .unwrap()
        .iter()
        .map(|message| {
            (
                message["type"].as_str().unwrap().to_string(),
                message["content"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[test]
fn test_each_method_posts_exactly_one_message() {
    let output = run(
        &BridgeOptions::default(),
        r#"console.log("hello"); console.error("hello"); console.warn("hello"); console.info("hello");"#,
    );

    assert_eq!(
        posted(&output),
        vec![
            ("console-log".to_string(), "hello".to_string()),
            ("console-error".to_string(), "hello".to_string()),
            ("console-warn".to_string(), "hello".to_string()),
            ("console-info".to_string(), "hello".to_string()),
        ]
    );
    assert_eq!(output["originals"], serde_json::json!(["log", "error", "warn", "info"]));
    assert!(output["posted"]
        .as_array()
        .unwrap()
        .iter()
        .all(|message| message["origin"] == "*"));
}

#[test]
fn test_arguments_are_formatted_and_joined() {
    let output = run(
        &BridgeOptions::default(),
        r#"
        console.log({ a: 1 }, 2, "x", null, undefined);
        var circular = {};
        circular.self = circular;
        console.warn(circular);
        var err = new Error("boom");
        err.stack = undefined;
        console.error(err);
        "#,
    );

    let messages = posted(&output);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].1, "{\n  \"a\": 1\n} 2 x null undefined");
    assert_eq!(messages[1], ("console-warn".to_string(), "[object Object]".to_string()));
    assert_eq!(messages[2], ("console-error".to_string(), "boom".to_string()));
}

#[test]
fn test_uncaught_errors_and_rejections_are_relayed() {
    let output = run(
        &BridgeOptions::default(),
        r#"
        listeners.error({ message: "x is not defined", filename: "app.js", lineno: 3 });
        listeners.unhandledrejection({ reason: "nope" });
        "#,
    );

    assert_eq!(
        posted(&output),
        vec![
            ("console-error".to_string(), "x is not defined (app.js:3)".to_string()),
            (
                "console-error".to_string(),
                "Unhandled promise rejection: nope".to_string()
            ),
        ]
    );
    assert_eq!(output["originals"], serde_json::json!([]));
}

#[test]
fn test_configured_target_origin_is_used() {
    let options = BridgeOptions {
        target_origin: "http://localhost:3030".to_string(),
    };
    let output = run(&options, r#"console.info("hi");"#);

    assert_eq!(output["posted"][0]["origin"], "http://localhost:3030");
}
