use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use codenano_assembler::assemble;
use codenano_workspace::load_directory;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Source directory (defaults to the configured srcDir)
    pub path: Option<String>,

    /// Preview mode (overrides config)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Output to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Output file
    #[arg(short, long, default_value = "dist/index.html")]
    pub out: String,

    /// Leave out the console bridge script
    #[arg(long)]
    pub no_bridge: bool,
}

pub fn build(args: BuildArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let src_dir = match &args.path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };

    if !src_dir.exists() {
        return Err(anyhow!("Source directory does not exist: {:?}", src_dir));
    }

    let mode = config.resolve_mode(args.mode.as_deref())?;
    let files = load_directory(&src_dir)?;
    let options = config.assemble_options(!args.no_bridge);

    if !args.stdout {
        println!(
            "{}",
            format!("🔨 Building {} preview...", mode).bright_blue().bold()
        );
        println!("Found {} files", files.len());
    }

    let document = assemble(mode, &files, &options)?;

    if args.stdout {
        println!("{}", document.as_str());
        return Ok(());
    }

    let output_file = PathBuf::from(cwd).join(&args.out);
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, document.as_str())?;

    println!(
        "  {} {} → {}",
        "✓".green(),
        src_dir.display(),
        args.out
    );
    println!();
    println!("{} Built {} bytes", "✅".green(), document.as_str().len());

    Ok(())
}
