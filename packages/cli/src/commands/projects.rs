use crate::config::Config;
use anyhow::Result;
use clap::Args;
use codenano_workspace::{FsProjectStore, ProjectStore, ProjectSummary, LOCAL_OWNER};
use colored::Colorize;

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    /// Only list projects owned by this user
    #[arg(long, default_value = LOCAL_OWNER)]
    pub owner: String,
}

pub fn projects(args: ProjectsArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store = FsProjectStore::new(config.get_store_dir(cwd), LOCAL_OWNER);
    let listed = store.list_projects(&args.owner)?;

    if listed.is_empty() {
        println!("No saved projects for {}", args.owner.bright_white());
        return Ok(());
    }

    println!("{}", format!("📁 {} project(s)", listed.len()).bright_blue().bold());
    for summary in &listed {
        println!("  {}", format_row(summary));
    }

    Ok(())
}

fn format_row(summary: &ProjectSummary) -> String {
    format!(
        "{:<24} {:<8} {:>3} files  {}",
        summary.id,
        summary.mode.as_str(),
        summary.file_count,
        summary.updated_at.format("%Y-%m-%d %H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenano_common::{FileSet, Mode, SourceFile};

    #[test]
    fn test_lists_saved_projects() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let store = FsProjectStore::new(Config::default().get_store_dir(cwd), LOCAL_OWNER);
        let files = FileSet::from_files(vec![SourceFile::from_path("App.vue", "")]).unwrap();
        store.save_project("counter", &files, Mode::Vue).unwrap();

        let summary = &store.list_projects(LOCAL_OWNER).unwrap()[0];
        let row = format_row(summary);
        assert!(row.starts_with("counter"));
        assert!(row.contains("vue"));
        assert!(row.contains("1 files"));

        projects(
            ProjectsArgs {
                owner: LOCAL_OWNER.to_string(),
            },
            cwd,
        )
        .unwrap();
    }
}
