use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use codenano_common::FileSet;
use codenano_workspace::{
    load_directory, serve as serve_host, spawn_watcher, AppState, FsProjectStore, PlaygroundState,
    ProjectStore, LOCAL_OWNER,
};
use colored::Colorize;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Preview mode (overrides config)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Re-render when files in the source directory change
    #[arg(short, long)]
    pub watch: bool,

    /// Open a saved project instead of the source directory
    #[arg(long, conflicts_with = "watch")]
    pub open_project: Option<String>,
}

pub fn serve(args: ServeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let port = args.port.unwrap_or(config.port);
    let src_dir = config.get_src_dir(cwd);

    let store = Arc::new(FsProjectStore::new(config.get_store_dir(cwd), LOCAL_OWNER));
    let playground = load_playground(&args, &config, cwd, store.as_ref())?;
    let mode_name = playground.mode_name();

    let state = AppState::new(playground, store, LOCAL_OWNER);
    let frame = state.render();

    println!(
        "{}",
        format!("🚀 CodeNANO preview ({} mode)", mode_name)
            .bright_blue()
            .bold()
    );
    println!("  {} Rendered {} bytes", "✓".green(), frame.document.len());

    if args.watch {
        if src_dir.exists() {
            spawn_watcher(state.clone(), src_dir.clone())?;
            println!("  {} Watching {}/", "✓".green(), config.src_dir);
        } else {
            println!(
                "{} Nothing to watch, {}/ does not exist",
                "⚠️".yellow(),
                config.src_dir
            );
        }
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!();
    println!("Open {}", format!("http://{}", addr).bright_white());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve_host(state, addr))?;

    Ok(())
}

/// Initial playground: a saved project when one is requested, otherwise the
/// source directory in the configured (or flagged) mode
fn load_playground(
    args: &ServeArgs,
    config: &Config,
    cwd: &str,
    store: &dyn ProjectStore,
) -> Result<PlaygroundState> {
    let options = config.assemble_options(true);

    if let Some(id) = &args.open_project {
        let project = store
            .load_project(id)
            .with_context(|| format!("Cannot open project {}", id))?;
        println!("  {} Opened project {}", "✓".green(), project.name);

        let mut playground = PlaygroundState::new(FileSet::new(), project.mode, options);
        playground.load_project(project);
        if let Some(mode) = &args.mode {
            playground.set_mode(config.resolve_mode(Some(mode))?);
        }
        return Ok(playground);
    }

    let mode = config.resolve_mode(args.mode.as_deref())?;
    let src_dir = config.get_src_dir(cwd);
    let files = if src_dir.exists() {
        load_directory(&src_dir)?
    } else {
        tracing::warn!("Source directory {:?} not found, starting empty", src_dir);
        FileSet::new()
    };

    Ok(PlaygroundState::new(files, mode, options))
}
