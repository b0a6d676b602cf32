//! Low-level tmux process wrappers
//!
//! Everything that actually spawns `tmux` lives here. Higher layers talk to
//! tmux through the [`Multiplexer`] trait so they can be driven by a fake in
//! tests.

use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};
use tracing::debug;

/// Name of the tmux binary
pub const TMUX_BIN: &str = "tmux";

/// Environment variable tmux sets inside its clients
pub const TMUX_ENV: &str = "TMUX";

/// Token tmux accepts between commands of a single invocation
pub const COMMAND_SEPARATOR: &str = ";";

/// Exact-match target for a session (`=<name>`).
///
/// A bare `-t <name>` lets tmux fall back to prefix matching, so `dev` would
/// resolve to a running `devtools`.
pub fn session_target(name: &str) -> String {
    format!("={}", name)
}

/// Exact-match target for a window inside a session (`=<session>:<window>`)
pub fn window_target(session: &str, window: &str) -> String {
    format!("={}:{}", session, window)
}

/// The operations ntmux needs from a running tmux server
pub trait Multiplexer {
    /// Whether a session with this name exists
    fn has_session(&self, name: &str) -> bool;

    /// Run one invocation with the given arguments and inherited standard streams
    fn execute(&self, args: &[String]) -> Result<()>;
}

/// Whether the caller is already inside a tmux client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Not inside tmux: attach a new client
    Outside,
    /// Inside tmux: switch the current client
    Inside,
}

impl Attachment {
    /// Check `TMUX` to see whether we are running inside a tmux client
    pub fn from_env() -> Self {
        if in_tmux() {
            Attachment::Inside
        } else {
            Attachment::Outside
        }
    }
}

/// Check if we're currently inside a tmux session
pub fn in_tmux() -> bool {
    std::env::var_os(TMUX_ENV).is_some()
}

/// The system tmux binary
#[derive(Debug, Clone, Default)]
pub struct Tmux;

impl Multiplexer for Tmux {
    /// Runs `has-session` on the exact-match target; only the exit status counts
    fn has_session(&self, name: &str) -> bool {
        tmux_status(&["has-session", "-t", &session_target(name)]).unwrap_or(false)
    }

    fn execute(&self, args: &[String]) -> Result<()> {
        debug!(?args, "running tmux");
        let status = Command::new(TMUX_BIN)
            .args(args)
            .status()
            .context("Failed to execute tmux command")?;
        if !status.success() {
            anyhow::bail!("tmux exited with {}", status);
        }
        Ok(())
    }
}

/// Execute a tmux command and check if it succeeded (suppressing output)
fn tmux_status(args: &[&str]) -> Result<bool> {
    Ok(Command::new(TMUX_BIN)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?
        .success())
}

/// Forward arguments to tmux unchanged, with inherited standard streams
pub fn pass_through<S: AsRef<std::ffi::OsStr>>(args: &[S]) -> Result<ExitStatus> {
    Command::new(TMUX_BIN)
        .args(args)
        .status()
        .context("Failed to execute tmux")
}

/// Run tmux and capture stdout and stderr together
pub fn pass_through_with_output(args: &[&str]) -> Result<String> {
    let output = Command::new(TMUX_BIN)
        .args(args)
        .output()
        .context("Failed to execute tmux")?;
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}
