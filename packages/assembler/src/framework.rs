//! Generated host documents for framework modes.
//!
//! The entry source is embedded verbatim (after Next.js normalization, if
//! any) inside a `try` block, so a throw during evaluation or mounting is
//! reported through `console.error` instead of escaping to the page.

use crate::bridge::bootstrap_tag;
use crate::diagnostic::escape_html;
use crate::options::AssembleOptions;
use crate::writer::DocumentWriter;
use codenano_common::SourceFile;
use regex::Regex;
use std::sync::LazyLock;

/// Component mounted when nothing better can be found
pub const DEFAULT_COMPONENT: &str = "App";

/// Top-level capitalized `function`, `class`, `const`, `let` or `var` names
static COMPONENT_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:export\s+(?:default\s+)?)?(?:function|class|const|let|var)\s+([A-Z][\w$]*)")
        .expect("Invalid component declaration regex")
});

const CATCH_BLOCK: &str =
    "} catch (err) {\n  console.error(err && err.message ? err.message : String(err));\n}";

/// Root component of a React entry. `App` wins when declared; otherwise the
/// declaration named after the file (`Widget.jsx` -> `Widget`), then the
/// first capitalized declaration.
pub(crate) fn react_component(entry: &SourceFile) -> String {
    let declared: Vec<&str> = COMPONENT_DECLARATION
        .captures_iter(&entry.content)
        .filter_map(|captures| captures.get(1).map(|m| m.as_str()))
        .collect();

    if declared.contains(&DEFAULT_COMPONENT) {
        return DEFAULT_COMPONENT.to_string();
    }

    let stem = entry.name.split('.').next().unwrap_or_default();
    if declared.contains(&stem) {
        return stem.to_string();
    }

    match declared.first() {
        Some(name) => name.to_string(),
        None => {
            tracing::debug!("No component declared in {}, mounting {}", entry.path, DEFAULT_COMPONENT);
            DEFAULT_COMPONENT.to_string()
        }
    }
}

pub(crate) fn react_document(
    source: &str,
    component: &str,
    stylesheet: Option<&SourceFile>,
    options: &AssembleOptions,
) -> String {
    let mut writer = DocumentWriter::new();
    open_document(&mut writer, stylesheet, options);

    writer.add_line(&format!(
        "<script crossorigin src=\"{}\"></script>",
        escape_html(&options.cdn.react)
    ));
    writer.add_line(&format!(
        "<script crossorigin src=\"{}\"></script>",
        escape_html(&options.cdn.react_dom)
    ));
    writer.add_line(&format!(
        "<script src=\"{}\"></script>",
        escape_html(&options.cdn.babel)
    ));

    close_head(&mut writer);

    writer.add_line("<div id=\"root\"></div>");
    writer.add_line("<script type=\"text/babel\" data-presets=\"react\">");
    writer.add_raw_block("try {");
    writer.add_raw_block(source);
    writer.add_raw_block(&format!(
        "ReactDOM.createRoot(document.getElementById(\"root\")).render(<{} />);",
        component
    ));
    writer.add_raw_block(CATCH_BLOCK);
    writer.add_line("</script>");

    close_document(&mut writer);
    writer.finish()
}

pub(crate) fn vue_document(
    source: &str,
    stylesheet: Option<&SourceFile>,
    options: &AssembleOptions,
) -> String {
    let mut writer = DocumentWriter::new();
    open_document(&mut writer, stylesheet, options);

    writer.add_line(&format!(
        "<script src=\"{}\"></script>",
        escape_html(&options.cdn.vue)
    ));

    close_head(&mut writer);

    writer.add_line("<div id=\"app\"></div>");
    writer.add_line("<script>");
    writer.add_raw_block("try {");
    writer.add_raw_block(source);
    writer.add_raw_block(
        "if (typeof App === \"undefined\") {\n  throw new Error(\"App.vue must define an App component\");\n}\nVue.createApp(App).mount(\"#app\");",
    );
    writer.add_raw_block(CATCH_BLOCK);
    writer.add_line("</script>");

    close_document(&mut writer);
    writer.finish()
}

fn open_document(writer: &mut DocumentWriter, stylesheet: Option<&SourceFile>, options: &AssembleOptions) {
    writer.add_line("<!DOCTYPE html>");
    writer.add_line("<html lang=\"en\">");
    writer.indent();
    writer.add_line("<head>");
    writer.indent();

    writer.add_line("<meta charset=\"UTF-8\">");
    writer.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    writer.add_line(&format!("<title>{}</title>", escape_html(&options.title)));

    if let Some(bridge) = &options.bridge {
        writer.add_line(&bootstrap_tag(bridge));
    }

    if let Some(stylesheet) = stylesheet {
        writer.add_line(&format!("<style>{}</style>", stylesheet.content));
    }
}

fn close_head(writer: &mut DocumentWriter) {
    writer.dedent();
    writer.add_line("</head>");
    writer.add_line("<body>");
    writer.indent();
}

fn close_document(writer: &mut DocumentWriter) {
    writer.dedent();
    writer.add_line("</body>");
    writer.dedent();
    writer.add_line("</html>");
}
