//! Shell detection and command wrapping.
//!
//! Window commands are not handed to tmux as-is: they are wrapped so the
//! window drops back into an interactive shell once the command exits.

/// Shell used when `SHELL` is unset
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Host platform family, which decides how commands are quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Platform this binary was built for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// The invoking user's shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    bin_path: String,
    name: String,
    platform: Platform,
}

impl Shell {
    /// Create a shell descriptor for an explicit path and platform
    pub fn new(bin_path: impl Into<String>, platform: Platform) -> Self {
        let bin_path = bin_path.into();
        let name = shell_name(&bin_path);
        Self {
            bin_path,
            name,
            platform,
        }
    }

    /// Detect the shell from `SHELL`, falling back to `/bin/sh`
    pub fn from_env() -> Self {
        let bin_path = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SHELL.to_string());
        Self::new(bin_path, Platform::current())
    }

    /// Full path to the shell executable
    pub fn bin_path(&self) -> &str {
        &self.bin_path
    }

    /// Short name of the shell (e.g. `zsh`, `pwsh`)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Build the shell invocation that runs `command` and then stays interactive.
    ///
    /// On Unix the command runs under `-c` and the shell `exec`s itself afterwards,
    /// so the window survives the command finishing or failing. On Windows the
    /// shell is started in its keep-open mode (`-NoExit` / `/K`).
    pub fn complete_command(&self, command: &str) -> String {
        let command = command.trim();

        match self.platform {
            Platform::Windows => {
                let escaped = command.replace('"', "\\\"");
                if self.name == "powershell" || self.name == "pwsh" {
                    format!(
                        "{} -NoExit -Command \"& {{{}}}\"",
                        self.bin_path, escaped
                    )
                } else {
                    format!("{} /K \"{}\"", self.bin_path, escaped)
                }
            }
            Platform::Unix => {
                let escaped = command.replace('\'', "'\\''");
                format!(
                    "{} -c '{}; exec {}'",
                    self.bin_path, escaped, self.bin_path
                )
            }
        }
    }
}

/// Basename of a shell path without any `.exe` suffix
fn shell_name(bin_path: &str) -> String {
    let base = bin_path.rsplit(['/', '\\']).next().unwrap_or(bin_path);
    base.strip_suffix(".exe").unwrap_or(base).to_string()
}
