//! Forwarding to tmux and the combined help screen.

use std::ffi::OsString;

use anyhow::Result;
use clap::CommandFactory;
use ntmux_core::tmux::{TMUX_BIN, pass_through, pass_through_with_output};
use tracing::debug;

use crate::cli::Cli;

/// Run tmux with `args` and exit with its status
pub fn do_pass_through(args: &[OsString]) -> Result<()> {
    let status = pass_through(args)?;
    if !status.success() {
        std::process::exit(status.code().unwrap_or(1));
    }
    Ok(())
}

/// Print ntmux's help followed by tmux's own usage text
pub fn print_unified_help() -> Result<()> {
    Cli::command().print_help()?;

    println!("\nTmux Help:");
    // tmux -h exits non-zero after printing usage, so only spawn failures matter
    match pass_through_with_output(&["-h"]) {
        Ok(output) => println!("{}", rebrand_help(&output)),
        Err(e) => debug!("could not read tmux help: {e:#}"),
    }

    Ok(())
}

/// Present tmux's help text under the ntmux name
fn rebrand_help(text: &str) -> String {
    text.replace(TMUX_BIN, "ntmux")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebrand_help() {
        assert_eq!(
            rebrand_help("usage: tmux [-2CDlNuVv] [-c shell-command]"),
            "usage: ntmux [-2CDlNuVv] [-c shell-command]"
        );
    }
}
