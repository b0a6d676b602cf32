//! ntmux Core - Core library for the ntmux session launcher
//!
//! This crate provides the core functionality for ntmux including:
//! - Template types, loading, and starter templates
//! - Batched tmux command building and execution
//! - Applying and stopping templates against a tmux server

pub mod error;
pub mod template;
pub mod tmux;
pub mod workspace;

// Re-export commonly used types at crate root
pub use error::Error;
pub use template::{Format, Session, Template, Window, discover_template, load_template};
pub use workspace::{apply, plan_apply, plan_stop, stop};
