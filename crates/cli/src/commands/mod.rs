//! Command handlers for the ntmux CLI.

pub mod passthrough;
pub mod session;
pub mod template;
