mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    build, init, projects, serve, BuildArgs, InitArgs, ProjectsArgs, ServeArgs,
};
use tracing_subscriber::EnvFilter;

/// CodeNANO CLI - live preview for HTML, React, Vue and Next.js sketches
#[derive(Parser, Debug)]
#[command(name = "codenano")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new CodeNANO project
    Init(InitArgs),

    /// Assemble the preview document into a standalone file
    Build(BuildArgs),

    /// Start the live preview host
    Serve(ServeArgs),

    /// List saved projects
    Projects(ProjectsArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Build(args) => build(args, &cwd),
                Command::Serve(args) => serve(args, &cwd),
                Command::Projects(args) => projects(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
