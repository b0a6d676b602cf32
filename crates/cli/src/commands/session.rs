//! Session commands for ntmux.
//!
//! This module handles the template lifecycle:
//! - Applying a template (create missing sessions, attach to the default one)
//! - Stopping a template (kill the declared sessions that are running)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use ntmux_core::{
    discover_template, load_template,
    template::TEMPLATE_FILES,
    tmux::{Attachment, Runner, Shell, Tmux},
    workspace,
};

/// Build a runner from the invoking environment
fn runner() -> Runner {
    Runner::new(Shell::from_env(), Attachment::from_env())
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Error getting current working directory")
}

/// Use the given template path, or discover one in `cwd`
fn resolve_template_path(template: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    match template {
        Some(path) => Ok(path.to_path_buf()),
        None => discover_template(cwd).ok_or_else(|| {
            anyhow::anyhow!(
                "No template file specified and no {} found in the current directory.",
                TEMPLATE_FILES.join(" or ")
            )
        }),
    }
}

/// Apply a template: create its missing sessions and attach to the default one
pub fn do_apply(template: Option<&Path>) -> Result<()> {
    let cwd = current_dir()?;
    let path = resolve_template_path(template, &cwd)?;
    let template = load_template(&path, &cwd).context("Error loading template")?;

    workspace::apply(&template, &Tmux, runner())
}

/// Stop a template: kill every declared session that is running
pub fn do_stop(template: Option<&Path>) -> Result<()> {
    let cwd = current_dir()?;
    let path = resolve_template_path(template, &cwd)?;
    let template = load_template(&path, &cwd).context("Error loading template")?;

    let planned = workspace::plan_stop(&template, &Tmux, runner());
    let count = planned.len();
    planned.execute(&Tmux)?;

    if count == 0 {
        println!("{}", "No running sessions to stop".dimmed());
    } else {
        let sessions_word = if count == 1 { "session" } else { "sessions" };
        println!(
            "{} {} {} {}",
            "✔".green(),
            "Stopped".dimmed(),
            count,
            sessions_word
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let cwd = Path::new("/nowhere");
        let path = resolve_template_path(Some(Path::new("dev.yaml")), cwd).unwrap();
        assert_eq!(path, PathBuf::from("dev.yaml"));
    }

    #[test]
    fn test_missing_template_message() {
        let tmp = TempDir::new().unwrap();

        let err = resolve_template_path(None, tmp.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No template file specified and no ntmux.json or ntmux.yaml found in the current directory."
        );
    }

    #[test]
    fn test_discovers_template_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let yaml = tmp.path().join("ntmux.yaml");
        std::fs::write(&yaml, "sessions: []\n").unwrap();

        assert_eq!(resolve_template_path(None, tmp.path()).unwrap(), yaml);
    }
}
