//! Apply and stop a template against a running tmux server.
//!
//! Both operations only queue commands on a [`Runner`] and flush it once at
//! the end. Sessions that already exist are left untouched by `apply`, which
//! makes re-applying a template safe: it just attaches again.

use anyhow::Result;
use tracing::debug;

use crate::{
    template::Template,
    tmux::{Multiplexer, Runner},
};

/// Queue the commands that realize `template`.
///
/// For every session missing from tmux:
/// 1. create it detached with its first window
/// 2. create the remaining windows in order
/// 3. select its default window
///
/// Then the template's default session is attached (or switched to), unless
/// it was skipped for having no windows.
pub fn plan_apply(template: &Template, mux: &dyn Multiplexer, mut runner: Runner) -> Runner {
    for session in &template.sessions {
        if mux.has_session(&session.name) {
            debug!(session = %session.name, "session exists, skipping");
            continue;
        }

        let Some((first, rest)) = session.windows.split_first() else {
            debug!(session = %session.name, "session has no windows, skipping");
            continue;
        };

        runner.new_session(
            &session.name,
            &session.dir,
            &first.name,
            first.cmd.as_deref(),
            true,
        );

        for window in rest {
            runner.new_window(&session.name, &window.name, &window.dir, window.cmd.as_deref());
        }

        if let Some(window) = session.default_window() {
            runner.select_window(&session.name, &window.name);
        }
    }

    if let Some(session) = template.default_session() {
        if session.windows.is_empty() && !mux.has_session(&session.name) {
            debug!(session = %session.name, "default session was not created, not attaching");
        } else {
            runner.attach_session(&session.name);
        }
    }

    runner
}

/// Create every missing session of `template` and attach to the default one
pub fn apply(template: &Template, mux: &dyn Multiplexer, runner: Runner) -> Result<()> {
    plan_apply(template, mux, runner).execute(mux)
}

/// Queue `kill-session` for every declared session that is running
pub fn plan_stop(template: &Template, mux: &dyn Multiplexer, mut runner: Runner) -> Runner {
    for session in &template.sessions {
        if mux.has_session(&session.name) {
            runner.kill_session(&session.name);
        } else {
            debug!(session = %session.name, "session not running");
        }
    }
    runner
}

/// Kill every running session declared in `template`
pub fn stop(template: &Template, mux: &dyn Multiplexer, runner: Runner) -> Result<()> {
    plan_stop(template, mux, runner).execute(mux)
}
