/// Human-readable placeholder shown in the preview surface instead of a
/// blank or broken document.
pub fn diagnostic_document(title: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 24px; background: #fef2f2; color: #991b1b; }}
    h1 {{ font-size: 16px; margin: 0 0 12px; color: #dc2626; }}
    pre {{ background: #fee2e2; padding: 12px; border-radius: 4px; white-space: pre-wrap; font-family: Monaco, Menlo, "Courier New", monospace; font-size: 13px; margin: 0; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <pre>{message}</pre>
</body>
</html>
"#,
        title = escape_html(title),
        message = escape_html(message),
    )
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
