use std::{ffi::OsString, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use ntmux_core::Format;

#[derive(Parser)]
#[command(name = "ntmux")]
#[command(about = "Yet another tmux wrapper")]
#[command(
    long_about = "Yet another tmux wrapper.\n\nRun without arguments to apply ntmux.json or ntmux.yaml from the current directory. Anything ntmux does not recognize is passed straight to tmux."
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a tmux session template
    Apply {
        /// Template file (default: ntmux.json or ntmux.yaml in the current directory)
        #[arg(value_name = "TEMPLATE_FILE")]
        template: Option<PathBuf>,
    },

    /// Stop the sessions declared in a template
    Stop {
        /// Template file (default: ntmux.json or ntmux.yaml in the current directory)
        #[arg(value_name = "TEMPLATE_FILE")]
        template: Option<PathBuf>,
    },

    /// Create a new ntmux template file
    #[command(
        long_about = "Create a new ntmux.json or ntmux.yaml template file in the current directory.\nIf a custom template exists at ~/.config/ntmux/template.json or ~/.config/ntmux/template.yaml,\nit will be used as the base. Otherwise, a default template will be created."
    )]
    NewTemplate {
        /// Format of the template file
        #[arg(short, long, value_enum, ignore_case = true, default_value_t = TemplateFormat::Json)]
        format: TemplateFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TemplateFormat {
    Json,
    Yaml,
}

impl From<TemplateFormat> for Format {
    fn from(format: TemplateFormat) -> Self {
        match format {
            TemplateFormat::Json => Format::Json,
            TemplateFormat::Yaml => Format::Yaml,
        }
    }
}

// =============================================================================
// Routing
// =============================================================================

/// What to do with a raw invocation
#[derive(Debug, PartialEq, Eq)]
pub enum Route {
    /// One of ntmux's own subcommands, parsed by clap
    Command,
    /// Combined ntmux + tmux help
    Help,
    /// No arguments and a template in the current directory
    AutoApply,
    /// Hand everything to tmux
    PassThrough,
}

const HELP_FLAGS: [&str; 4] = ["-h", "-help", "--help", "help"];

/// Decide how to handle `args` (without the program name)
pub fn route(args: &[OsString], has_template: bool) -> Route {
    match args.first().map(|a| a.to_string_lossy()) {
        None if has_template => Route::AutoApply,
        None => Route::PassThrough,
        Some(first) if is_own_command(&first) => Route::Command,
        Some(_) if args.iter().any(|a| is_help_flag(a)) => Route::Help,
        Some(_) => Route::PassThrough,
    }
}

fn is_own_command(name: &str) -> bool {
    Cli::command()
        .get_subcommands()
        .any(|cmd| cmd.get_name() == name)
}

fn is_help_flag(arg: &OsString) -> bool {
    arg.to_str().is_some_and(|a| HELP_FLAGS.contains(&a))
}
