//! Next.js page normalization.
//!
//! This is superficial text rewriting, not a transpiler. It turns a
//! single-file page with one default-exported function component into a
//! script Babel can run directly:
//!
//! - `"use client"` directive lines are removed
//! - imports from `react` / `react-dom` are removed; named bindings they
//!   introduced are re-bound from the UMD globals
//!   (`import { useState } from 'react'` becomes `const { useState } = React;`)
//! - `export default function Name(` becomes `function Name(`
//! - an anonymous `export default function (` becomes `function Page(`
//! - a trailing `export default Name;` is removed and `Name` is mounted
//!
//! Anything beyond that shape (other imports, several exports, re-exports)
//! passes through unchanged and will surface as a runtime error in the
//! sandbox console.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Component name used when the default export has no name
pub const FALLBACK_COMPONENT: &str = "Page";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPage {
    pub source: String,
    /// Function to mount as the root component
    pub component: String,
}

static USE_CLIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*['"]use client['"];?[ \t]*\r?\n?"#).expect("Invalid directive regex")
});

static REACT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ \t]*import\s+(?:([\w$*\s{},]+?)\s+from\s+)?['"](react|react-dom|react-dom/client)['"];?[ \t]*\r?\n?"#,
    )
    .expect("Invalid import regex")
});

static NAMED_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+default\s+function\s+([A-Za-z_$][\w$]*)\s*\(")
        .expect("Invalid named export regex")
});

static ANONYMOUS_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+default\s+function\s*\(").expect("Invalid anonymous export regex")
});

static TRAILING_EXPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+default\s+([A-Za-z_$][\w$]*)\s*;?[ \t]*$")
        .expect("Invalid trailing export regex")
});

pub fn normalize_page(source: &str) -> NormalizedPage {
    let source = USE_CLIENT.replace_all(source, "");
    let source = REACT_IMPORT.replace_all(&source, |captures: &Captures| {
        let global = match &captures[2] {
            "react" => "React",
            _ => "ReactDOM",
        };
        captures
            .get(1)
            .map(|clause| rebind_imports(clause.as_str(), global))
            .unwrap_or_default()
    });

    let mut component = None;

    let source = match NAMED_EXPORT.captures(&source) {
        Some(captures) => {
            component = captures.get(1).map(|m| m.as_str().to_string());
            NAMED_EXPORT.replace(&source, "function $1(").into_owned()
        }
        None => source.into_owned(),
    };

    let source = if component.is_none() && ANONYMOUS_EXPORT.is_match(&source) {
        component = Some(FALLBACK_COMPONENT.to_string());
        ANONYMOUS_EXPORT
            .replace(&source, format!("function {}(", FALLBACK_COMPONENT).as_str())
            .into_owned()
    } else {
        source
    };

    let source = if component.is_none() {
        match TRAILING_EXPORT.captures(&source) {
            Some(captures) => {
                component = captures.get(1).map(|m| m.as_str().to_string());
                TRAILING_EXPORT.replace(&source, "").into_owned()
            }
            None => source,
        }
    } else {
        source
    };

    let component = component.unwrap_or_else(|| {
        tracing::debug!("No default export found, mounting {}", FALLBACK_COMPONENT);
        FALLBACK_COMPONENT.to_string()
    });

    NormalizedPage { source, component }
}

/// Declarations standing in for an import clause, bound to a UMD global.
/// The global's own name (`React`) needs no declaration.
fn rebind_imports(clause: &str, global: &str) -> String {
    let mut statements = Vec::new();

    let (outside, named) = match (clause.find('{'), clause.rfind('}')) {
        (Some(open), Some(close)) if open < close => (
            format!("{}{}", &clause[..open], &clause[close + 1..]),
            Some(&clause[open + 1..close]),
        ),
        _ => (clause.to_string(), None),
    };

    for binding in outside.split(',').map(str::trim).filter(|b| !b.is_empty()) {
        let local = binding
            .strip_prefix('*')
            .and_then(|rest| rest.trim().strip_prefix("as"))
            .map(str::trim)
            .unwrap_or(binding);
        if local != global {
            statements.push(format!("const {} = {};", local, global));
        }
    }

    if let Some(named) = named {
        let bindings: Vec<String> = named
            .split(',')
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(|binding| match binding.split_once(" as ") {
                Some((imported, local)) => format!("{}: {}", imported.trim(), local.trim()),
                None => binding.to_string(),
            })
            .collect();
        if !bindings.is_empty() {
            statements.push(format!("const {{ {} }} = {};", bindings.join(", "), global));
        }
    }

    if statements.is_empty() {
        String::new()
    } else {
        format!("{}\n", statements.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_typical_page() {
        let source = r#"'use client';
import React, { useState } from 'react';

export default function Home() {
  const [count, setCount] = useState(0);
  return <button onClick={() => setCount(count + 1)}>{count}</button>;
}
"#;

        let page = normalize_page(source);

        assert_eq!(page.component, "Home");
        assert!(!page.source.contains("use client"));
        assert!(!page.source.contains("import"));
        assert!(!page.source.contains("export default"));
        assert!(page.source.starts_with("const { useState } = React;\n"));
        assert!(page.source.contains("function Home() {"));
        assert!(page.source.contains("useState(0)"));
    }

    #[test]
    fn test_double_quoted_directive_and_side_effect_import() {
        let source = "\"use client\"\nimport 'react';\nimport * as React from \"react\";\nexport default function About() { return null; }\n";
        let page = normalize_page(source);

        assert_eq!(page.source, "function About() { return null; }\n");
        assert_eq!(page.component, "About");
    }

    #[test]
    fn test_multiline_named_import() {
        let source = "import {\n  useState,\n  useEffect as onMount,\n} from 'react';\nexport default function Page() {}\n";
        let page = normalize_page(source);

        assert!(!page.source.contains("import"));
        assert!(page
            .source
            .starts_with("const { useState, useEffect: onMount } = React;\n"));
    }

    #[test]
    fn test_aliased_default_and_react_dom() {
        let source = "import R from 'react';\nimport { createRoot } from 'react-dom/client';\nexport default function Home() {}\n";
        let page = normalize_page(source);

        assert!(page.source.contains("const R = React;\n"));
        assert!(page.source.contains("const { createRoot } = ReactDOM;\n"));
    }

    #[test]
    fn test_anonymous_default_export() {
        let page = normalize_page("export default function () { return <p/>; }");
        assert_eq!(page.component, FALLBACK_COMPONENT);
        assert_eq!(page.source, "function Page() { return <p/>; }");
    }

    #[test]
    fn test_trailing_default_export() {
        let source = "const Dashboard = () => <main/>;\nexport default Dashboard;\n";
        let page = normalize_page(source);

        assert_eq!(page.component, "Dashboard");
        assert!(!page.source.contains("export"));
        assert!(page.source.contains("const Dashboard"));
    }

    #[test]
    fn test_no_export_falls_back() {
        let page = normalize_page("function Page() { return null; }");
        assert_eq!(page.component, FALLBACK_COMPONENT);
        assert_eq!(page.source, "function Page() { return null; }");
    }

    #[test]
    fn test_other_imports_pass_through() {
        let source = "import Link from 'next/link';\nexport default function Home() {}\n";
        let page = normalize_page(source);

        assert!(page.source.contains("import Link from 'next/link';"));
    }

    #[test]
    fn test_strings_mentioning_react_are_kept() {
        let source = "export default function Home() { return <p>import x from 'react'</p>; }";
        let page = normalize_page(source);
        assert!(page.source.contains("import x from 'react'"));
    }
}
