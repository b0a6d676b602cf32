//! Tmux control for ntmux.
//!
//! # Submodules
//!
//! - [`commands`]: process wrappers and the [`Multiplexer`] seam
//! - [`runner`]: the batched command [`Runner`]
//! - [`shell`]: shell detection and command wrapping
//!
//! Commands are never sent one by one. They are queued on a [`Runner`] and
//! flushed in a single tmux invocation:
//!
//! ```ignore
//! use ntmux_core::tmux::{Attachment, Runner, Shell, Tmux};
//!
//! let mut runner = Runner::new(Shell::from_env(), Attachment::from_env());
//! runner.kill_session("dev");
//! runner.execute(&Tmux)?;
//! ```

mod commands;
mod runner;
mod shell;

pub use commands::*;
pub use runner::*;
pub use shell::*;

#[cfg(test)]
pub(crate) use runner::testing;
