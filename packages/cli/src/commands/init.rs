use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use codenano_common::Mode;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Preview mode (html, react, vue, nextjs)
    #[arg(short, long, default_value = "html")]
    pub mode: String,

    /// Source directory
    #[arg(short, long, default_value = "src")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

/// Files a fresh project starts with, per mode
pub fn starter_files(mode: Mode) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::Html => &[
            (
                "index.html",
                "<!DOCTYPE html>\n<html>\n<head>\n  <title>Hello</title>\n</head>\n<body>\n  <h1>Hello, CodeNANO!</h1>\n  <button id=\"counter\">Clicked 0 times</button>\n</body>\n</html>\n",
            ),
            (
                "style.css",
                "body {\n  font-family: sans-serif;\n  padding: 2rem;\n}\n",
            ),
            (
                "app.js",
                "let count = 0;\nconst button = document.getElementById('counter');\nbutton.addEventListener('click', () => {\n  count += 1;\n  button.textContent = `Clicked ${count} times`;\n  console.log('count', count);\n});\n",
            ),
        ],
        Mode::React => &[
            (
                "App.jsx",
                "function App() {\n  const [count, setCount] = React.useState(0);\n  return (\n    <button onClick={() => setCount(count + 1)}>\n      Clicked {count} times\n    </button>\n  );\n}\n",
            ),
            ("App.css", "button {\n  padding: 8px 16px;\n}\n"),
        ],
        Mode::Vue => &[(
            "App.vue",
            "const App = {\n  data() {\n    return { count: 0 };\n  },\n  template: `<button @click=\"count++\">Clicked {{ count }} times</button>`,\n};\n",
        )],
        Mode::Nextjs => &[
            (
                "app/page.jsx",
                "'use client';\nimport { useState } from 'react';\n\nexport default function Home() {\n  const [count, setCount] = useState(0);\n  return <button onClick={() => setCount(count + 1)}>Clicked {count} times</button>;\n}\n",
            ),
            (
                "app/layout.jsx",
                "export default function RootLayout({ children }) {\n  return <html><body>{children}</body></html>;\n}\n",
            ),
        ],
    }
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mode: Mode = args
        .mode
        .parse()
        .map_err(|e| anyhow::anyhow!("Unknown mode {}", e))?;

    println!(
        "{}",
        format!("📝 Initializing CodeNANO {} project...", mode)
            .bright_blue()
            .bold()
    );

    let src_dir = PathBuf::from(cwd).join(&args.src_dir);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    // Never clobber files the user already has
    for (path, content) in starter_files(mode) {
        let file = src_dir.join(path);
        if file.exists() {
            continue;
        }
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, content)?;
        println!("  {} Created {}/{}", "✓".green(), args.src_dir, path);
    }

    let config = Config {
        src_dir: args.src_dir.clone(),
        mode: mode.to_string(),
        ..Default::default()
    };

    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: codenano serve --watch");
    println!("  2. Open http://localhost:{}", config.port);
    println!("  3. Or build a standalone page: codenano build --out dist/index.html");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenano_assembler::{assemble, AssembleOptions};
    use codenano_common::{FileSet, SourceFile};

    #[test]
    fn test_every_starter_assembles() {
        for mode in Mode::ALL {
            let files = FileSet::from_files(
                starter_files(mode)
                    .iter()
                    .map(|(path, content)| SourceFile::from_path(*path, *content))
                    .collect(),
            )
            .unwrap();

            let document = assemble(mode, &files, &AssembleOptions::default());
            assert!(document.is_ok(), "{} starter failed to assemble", mode);
        }
    }

    #[test]
    fn test_init_writes_config_and_sources() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();

        init(
            InitArgs {
                mode: "react".to_string(),
                src_dir: "src".to_string(),
                force: false,
            },
            cwd,
        )
        .unwrap();

        let config = Config::load(cwd).unwrap();
        assert_eq!(config.mode, "react");
        assert!(dir.path().join("src/App.jsx").exists());
    }
}
