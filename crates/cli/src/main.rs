//! ntmux CLI - declarative tmux sessions.
//!
//! ntmux creates and restores tmux layouts from an `ntmux.json` / `ntmux.yaml`
//! template and otherwise behaves like tmux itself.
//!
//! # Workflow
//!
//! 1. User runs `ntmux` in a project directory
//! 2. If a template is found there, its sessions are created and attached
//! 3. With arguments ntmux does not know, the call is forwarded to tmux
//!
//! Core functionality (templates, command batching, orchestration) is in
//! `ntmux-core`.

mod cli;
mod commands;

use std::ffi::OsString;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, Route, route};
use colored::Colorize;
use commands::{
    passthrough::{do_pass_through, print_unified_help},
    session::{do_apply, do_stop},
    template::new_template,
};
use ntmux_core::discover_template;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (falls back to `RUST_LOG`)
const LOG_ENV: &str = "NTMUX_LOG";

// =============================================================================
// Main Entry Point
// =============================================================================

/// Entry point for the ntmux CLI.
///
/// - **Own subcommands** (`apply`, `stop`, `new-template`): parsed by clap
/// - **Help flags**: ntmux help followed by tmux help
/// - **No args**: apply `ntmux.json`/`ntmux.yaml` if present, else plain tmux
/// - **Anything else**: forwarded to tmux
fn main() -> Result<()> {
    init_logging();

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let has_template = args.is_empty()
        && std::env::current_dir()
            .ok()
            .and_then(|dir| discover_template(&dir))
            .is_some();

    let result = match route(&args, has_template) {
        Route::Command => run_command(Cli::parse()),
        Route::Help => print_unified_help(),
        Route::AutoApply => do_apply(None),
        Route::PassThrough => do_pass_through(&args),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✘".red(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Apply { template } => do_apply(template.as_deref()),
        Commands::Stop { template } => do_stop(template.as_deref()),
        Commands::NewTemplate { format } => new_template(format.into()),
    }
}

/// Log to stderr, filtered by `NTMUX_LOG` or `RUST_LOG` (default: warn)
fn init_logging() {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}
