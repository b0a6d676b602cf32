//! Batched tmux command runner
//!
//! [`Runner`] collects tmux commands without running them. [`Runner::execute`]
//! then sends the whole batch to tmux as one invocation, separated by `;`, so
//! commands that target a session or window always run after it was created.
//!
//! ```ignore
//! let mut runner = Runner::new(Shell::from_env(), Attachment::from_env());
//! runner
//!     .new_session("dev", "/proj", "editor", Some("nvim ."), true)
//!     .select_window("dev", "editor")
//!     .attach_session("dev");
//! runner.execute(&Tmux)?;
//! ```

use anyhow::Result;
use tracing::debug;

use super::{
    commands::{Attachment, COMMAND_SEPARATOR, Multiplexer, session_target, window_target},
    shell::Shell,
};

/// Ordered batch of tmux commands, flushed once
#[derive(Debug, Clone)]
pub struct Runner {
    shell: Shell,
    attachment: Attachment,
    commands: Vec<Vec<String>>,
}

impl Runner {
    /// Create an empty batch.
    ///
    /// `shell` wraps window commands, `attachment` decides between
    /// `attach-session` and `switch-client`.
    pub fn new(shell: Shell, attachment: Attachment) -> Self {
        Self {
            shell,
            attachment,
            commands: Vec::new(),
        }
    }

    /// Commands queued so far, in order
    pub fn commands(&self) -> &[Vec<String>] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Queue `new-session -s <name> -c <dir> [-d] [-n <window>] [<cmd>]`
    pub fn new_session(
        &mut self,
        name: &str,
        dir: &str,
        window_name: &str,
        command: Option<&str>,
        detached: bool,
    ) -> &mut Self {
        let mut args = vec![
            "new-session".to_string(),
            "-s".to_string(),
            name.to_string(),
            "-c".to_string(),
            dir.to_string(),
        ];

        if detached {
            args.push("-d".to_string());
        }

        if !window_name.is_empty() {
            args.push("-n".to_string());
            args.push(window_name.to_string());
        }

        // Shell command must come last
        if let Some(cmd) = self.wrap(command) {
            args.push(cmd);
        }

        self.push(args)
    }

    /// Queue `new-window -t =<session>: -n <name> -c <dir> [<cmd>]`
    pub fn new_window(
        &mut self,
        session: &str,
        name: &str,
        dir: &str,
        command: Option<&str>,
    ) -> &mut Self {
        let mut args = vec![
            "new-window".to_string(),
            "-t".to_string(),
            window_target(session, ""),
            "-n".to_string(),
            name.to_string(),
            "-c".to_string(),
            dir.to_string(),
        ];

        if let Some(cmd) = self.wrap(command) {
            args.push(cmd);
        }

        self.push(args)
    }

    /// Queue `select-window -t =<session>:<window>`
    pub fn select_window(&mut self, session: &str, window: &str) -> &mut Self {
        self.push(vec![
            "select-window".to_string(),
            "-t".to_string(),
            window_target(session, window),
        ])
    }

    /// Queue `attach-session`, or `switch-client` when already inside tmux
    pub fn attach_session(&mut self, session: &str) -> &mut Self {
        let command = match self.attachment {
            Attachment::Outside => "attach-session",
            Attachment::Inside => "switch-client",
        };
        self.push(vec![
            command.to_string(),
            "-t".to_string(),
            session_target(session),
        ])
    }

    /// Queue `kill-session -t =<session>`
    pub fn kill_session(&mut self, session: &str) -> &mut Self {
        self.push(vec![
            "kill-session".to_string(),
            "-t".to_string(),
            session_target(session),
        ])
    }

    /// The whole batch as one argument list, commands joined by `;`
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                args.push(COMMAND_SEPARATOR.to_string());
            }
            args.extend(command.iter().cloned());
        }
        args
    }

    /// Send the batch to tmux in a single invocation.
    ///
    /// Does nothing when the batch is empty. There is no rollback: if tmux
    /// rejects a later command, the earlier ones have already taken effect.
    pub fn execute(self, mux: &dyn Multiplexer) -> Result<()> {
        if self.is_empty() {
            debug!("no tmux commands queued");
            return Ok(());
        }
        mux.execute(&self.to_args())
    }

    fn wrap(&self, command: Option<&str>) -> Option<String> {
        command
            .filter(|c| !c.trim().is_empty())
            .map(|c| self.shell.complete_command(c))
    }

    fn push(&mut self, args: Vec<String>) -> &mut Self {
        debug!(command = %args.join(" "), "queued tmux command");
        self.commands.push(args);
        self
    }
}
