//! Template model and loading for ntmux session layouts
//!
//! A template declares tmux sessions and their windows in either JSON or YAML:
//!
//! ```yaml
//! sessions:
//!   - name: dev
//!     dir: ./app
//!     windows:
//!       - name: editor
//!         cmd: nvim .
//!         default: true
//!       - name: terminal
//! ```
//!
//! Loading resolves every directory against the invocation's base directory and
//! marks exactly one session as the default. Window defaults are picked when the
//! layout is applied (see [`Session::default_window`]).

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

// =============================================================================
// Constants
// =============================================================================

/// Schema reference written into generated JSON templates
pub const SCHEMA_URL: &str = "https://raw.githubusercontent.com/coeeter/ntmux/main/schema.json";

/// Template file names looked up in the current directory, in priority order
pub const TEMPLATE_FILES: [&str; 2] = ["ntmux.json", "ntmux.yaml"];

/// Custom starter template names inside `~/.config/ntmux`, in priority order
const CUSTOM_TEMPLATE_FILES: [&str; 3] = ["template.json", "template.yaml", "template.yml"];

const CONFIG_DIR: &str = ".config";
const NTMUX_DIR: &str = "ntmux";

// =============================================================================
// Format
// =============================================================================

/// Serialization format of a template file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Pick the format from a file extension (`.yaml`/`.yml` are YAML, anything else JSON)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    /// File extension used when writing a template in this format
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }

    fn parse(self, path: &Path, content: &str) -> Result<Template> {
        match self {
            Format::Json => serde_json::from_str(content).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                source,
            }),
            Format::Yaml => serde_yaml::from_str(content).map_err(|source| Error::Yaml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

// =============================================================================
// Template Types
// =============================================================================

/// Root document of a template file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Editor schema reference, ignored when applying
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Sessions to create, in order
    #[serde(default)]
    pub sessions: Vec<Session>,
}

/// A tmux session declared in a template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session name (used as the tmux session id)
    pub name: String,
    /// Working directory, relative to the base directory
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dir: String,
    /// Windows in creation order; the first one is the session's initial window
    #[serde(default)]
    pub windows: Vec<Window>,
    /// Attach to this session once everything is created
    #[serde(default, skip_serializing_if = "is_false")]
    pub default: bool,
}

/// A window inside a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Window name
    pub name: String,
    /// Working directory (inherits the session directory when empty)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dir: String,
    /// Command to run when the window is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,
    /// Focus this window after the session is created
    #[serde(default, skip_serializing_if = "is_false")]
    pub default: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Template {
    /// Built-in starter template with a single session named `name`
    pub fn starter(name: &str) -> Self {
        Template {
            schema: Some(SCHEMA_URL.to_string()),
            sessions: vec![Session {
                name: name.to_string(),
                dir: String::new(),
                default: true,
                windows: vec![
                    Window {
                        name: "editor".to_string(),
                        cmd: Some("nvim .".to_string()),
                        default: true,
                        ..Window::default()
                    },
                    Window {
                        name: "terminal".to_string(),
                        ..Window::default()
                    },
                ],
            }],
        }
    }

    /// The session to attach to: the one flagged default, else the first
    pub fn default_session(&self) -> Option<&Session> {
        self.sessions
            .iter()
            .find(|s| s.default)
            .or_else(|| self.sessions.first())
    }

    /// Serialize the template; YAML output drops the `$schema` reference
    pub fn to_string_in(&self, format: Format) -> Result<String> {
        match format {
            Format::Json => serde_json::to_string_pretty(self)
                .map(|json| json + "\n")
                .map_err(|e| Error::Serialize(e.to_string())),
            Format::Yaml => {
                let template = Template {
                    schema: None,
                    ..self.clone()
                };
                serde_yaml::to_string(&template).map_err(|e| Error::Serialize(e.to_string()))
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self.sessions.iter().find(|s| s.windows.is_empty()) {
            Some(session) => Err(Error::EmptySession {
                session: session.name.clone(),
            }),
            None => Ok(()),
        }
    }

    fn resolve_dirs(&mut self, base_dir: &Path) {
        for session in &mut self.sessions {
            session.dir = if session.dir.is_empty() {
                base_dir.to_string_lossy().into_owned()
            } else {
                path_string(&resolve_dir(base_dir, &session.dir))
            };

            for window in &mut session.windows {
                window.dir = if window.dir.is_empty() {
                    session.dir.clone()
                } else {
                    // Window dirs are relative to the base dir, not the session dir
                    path_string(&resolve_dir(base_dir, &window.dir))
                };
            }
        }
    }

    fn normalize_defaults(&mut self) {
        let mut seen = false;
        for session in &mut self.sessions {
            if session.default {
                if seen {
                    session.default = false;
                }
                seen = true;
            }
        }

        if !seen && let Some(first) = self.sessions.first_mut() {
            first.default = true;
        }
    }
}

impl Session {
    /// The window to focus: the first one flagged default, else the first window
    pub fn default_window(&self) -> Option<&Window> {
        self.windows
            .iter()
            .find(|w| w.default)
            .or_else(|| self.windows.first())
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load a template file and resolve it against `base_dir`.
///
/// The format is taken from the file extension. Directories are resolved and
/// the default session is assigned before the template is returned.
pub fn load_template(path: &Path, base_dir: &Path) -> Result<Template> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut template = Format::from_path(path).parse(path, &content)?;
    template.validate()?;
    template.resolve_dirs(base_dir);
    template.normalize_defaults();

    debug!(
        path = %path.display(),
        sessions = template.sessions.len(),
        "loaded template"
    );
    Ok(template)
}

/// Find `ntmux.json` or `ntmux.yaml` in `dir`
pub fn discover_template(dir: &Path) -> Option<PathBuf> {
    TEMPLATE_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Directory holding the user's custom starter template (`~/.config/ntmux`)
pub fn custom_template_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(NTMUX_DIR))
}

/// Load the first readable and valid custom starter template from `config_dir`
pub fn load_custom_template(config_dir: &Path) -> Option<Template> {
    CUSTOM_TEMPLATE_FILES.iter().find_map(|name| {
        let path = config_dir.join(name);
        let content = std::fs::read_to_string(&path).ok()?;
        match Format::from_path(&path).parse(&path, &content) {
            Ok(template) => {
                debug!(path = %path.display(), "using custom template");
                Some(template)
            }
            Err(e) => {
                warn!(error = ?e, "skipping custom template");
                None
            }
        }
    })
}

/// Write a template to `path`, refusing to replace an existing file
pub fn write_template(template: &Template, path: &Path, format: Format) -> Result<()> {
    if path.exists() {
        return Err(Error::AlreadyExists {
            path: path.to_path_buf(),
        });
    }

    let content = template.to_string_in(format)?;
    std::fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Path Helpers
// =============================================================================

/// Resolve a declared directory against `base_dir`.
///
/// `~/` is expanded to the home directory and absolute paths are kept. The
/// result is normalized lexically (`.` dropped, `..` pops a component).
pub fn resolve_dir(base_dir: &Path, dir: &str) -> PathBuf {
    normalize_path(&base_dir.join(expand_path(dir)))
}

/// Expand ~ to home directory in paths
pub fn expand_path(path: &str) -> String {
    path.strip_prefix("~/")
        .and_then(|stripped| dirs::home_dir().map(|home| home.join(stripped)))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("ntmux.yaml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a/b.yml")), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("ntmux.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("ntmux")), Format::Json);
    }

    #[test]
    fn test_load_json_resolves_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "ntmux.json",
            r#"{
                "$schema": "https://example.com/schema.json",
                "sessions": [
                    {
                        "name": "dev",
                        "dir": "app",
                        "windows": [
                            { "name": "editor", "cmd": "nvim ." },
                            { "name": "logs", "dir": "./var/log" }
                        ]
                    }
                ]
            }"#,
        );

        let template = load_template(&path, Path::new("/proj")).unwrap();
        let session = &template.sessions[0];
        assert_eq!(session.dir, "/proj/app");
        // Empty window dir inherits the resolved session dir
        assert_eq!(session.windows[0].dir, "/proj/app");
        // Non-empty window dir resolves against the base dir
        assert_eq!(session.windows[1].dir, "/proj/var/log");
        assert_eq!(session.windows[0].cmd.as_deref(), Some("nvim ."));
        assert_eq!(
            template.schema.as_deref(),
            Some("https://example.com/schema.json")
        );
    }

    #[test]
    fn test_load_yaml_empty_dirs_use_base_dir() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "ntmux.yaml",
            "sessions:\n  - name: dev\n    windows:\n      - name: editor\n      - name: term\n",
        );

        let template = load_template(&path, Path::new("/proj")).unwrap();
        let session = &template.sessions[0];
        assert_eq!(session.dir, "/proj");
        assert!(session.windows.iter().all(|w| w.dir == "/proj"));
    }

    #[test]
    fn test_first_session_becomes_default() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "ntmux.yaml",
            "sessions:\n  - name: a\n    windows: [{name: w}]\n  - name: b\n    windows: [{name: w}]\n",
        );

        let template = load_template(&path, Path::new("/proj")).unwrap();
        let defaults: Vec<&str> = template
            .sessions
            .iter()
            .filter(|s| s.default)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(defaults, vec!["a"]);
    }

    #[test]
    fn test_explicit_default_session_kept() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            "ntmux.yaml",
            "sessions:\n  - name: a\n    windows: [{name: w}]\n  - name: b\n    default: true\n    windows: [{name: w}]\n  - name: c\n    default: true\n    windows: [{name: w}]\n",
        );

        let template = load_template(&path, Path::new("/proj")).unwrap();
        let flags: Vec<bool> = template.sessions.iter().map(|s| s.default).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(template.default_session().unwrap().name, "b");
    }

    #[test]
    fn test_default_window_falls_back_to_first() {
        let session = Session {
            name: "dev".to_string(),
            windows: vec![
                Window {
                    name: "one".to_string(),
                    ..Window::default()
                },
                Window {
                    name: "two".to_string(),
                    ..Window::default()
                },
            ],
            ..Session::default()
        };
        assert_eq!(session.default_window().unwrap().name, "one");

        let mut flagged = session.clone();
        flagged.windows[1].default = true;
        assert_eq!(flagged.default_window().unwrap().name, "two");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_template(&tmp.path().join("nope.json"), tmp.path()).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_malformed_content_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let json = write(&tmp, "bad.json", "{ \"sessions\": 42 }");
        assert!(matches!(
            load_template(&json, tmp.path()).unwrap_err(),
            Error::Json { .. }
        ));

        let yaml = write(&tmp, "bad.yaml", "sessions:\n  - windows: []\n");
        assert!(matches!(
            load_template(&yaml, tmp.path()).unwrap_err(),
            Error::Yaml { .. }
        ));
    }

    #[test]
    fn test_session_without_windows_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "ntmux.json", r#"{"sessions":[{"name":"dev"}]}"#);
        let err = load_template(&path, tmp.path()).unwrap_err();
        assert!(
            matches!(err, Error::EmptySession { ref session } if session == "dev")
        );
    }

    #[test]
    fn test_resolve_dir() {
        assert_eq!(
            resolve_dir(Path::new("/proj"), "src"),
            PathBuf::from("/proj/src")
        );
        assert_eq!(
            resolve_dir(Path::new("/proj"), "./src/"),
            PathBuf::from("/proj/src")
        );
        assert_eq!(
            resolve_dir(Path::new("/proj/a"), "../b"),
            PathBuf::from("/proj/b")
        );
        assert_eq!(
            resolve_dir(Path::new("/proj"), "/srv/www"),
            PathBuf::from("/srv/www")
        );
        assert_eq!(resolve_dir(Path::new("/"), "../.."), PathBuf::from("/"));
    }

    #[test]
    fn test_resolve_dir_expands_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            resolve_dir(Path::new("/proj"), "~/code"),
            home.join("code")
        );

        // Only `~/` is expanded; a bare `~` or `~user` is an ordinary relative name
        assert_eq!(resolve_dir(Path::new("/proj"), "~"), PathBuf::from("/proj/~"));
        assert_eq!(
            resolve_dir(Path::new("/proj"), "~user/x"),
            PathBuf::from("/proj/~user/x")
        );
    }

    #[test]
    fn test_discover_prefers_json() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(discover_template(tmp.path()), None);

        write(&tmp, "ntmux.yaml", "sessions: []\n");
        assert_eq!(
            discover_template(tmp.path()),
            Some(tmp.path().join("ntmux.yaml"))
        );

        write(&tmp, "ntmux.json", "{\"sessions\": []}");
        assert_eq!(
            discover_template(tmp.path()),
            Some(tmp.path().join("ntmux.json"))
        );
    }

    #[test]
    fn test_discover_ignores_directories() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("ntmux.json")).unwrap();
        assert_eq!(discover_template(tmp.path()), None);
    }

    #[test]
    fn test_starter_template() {
        let template = Template::starter("myproj");
        assert_eq!(template.schema.as_deref(), Some(SCHEMA_URL));
        let session = &template.sessions[0];
        assert_eq!(session.name, "myproj");
        assert!(session.default);
        assert_eq!(session.windows[0].name, "editor");
        assert_eq!(session.windows[0].cmd.as_deref(), Some("nvim ."));
        assert_eq!(session.default_window().unwrap().name, "editor");
        assert_eq!(session.windows[1].name, "terminal");
    }

    #[test]
    fn test_json_output_shape() {
        let json = Template::starter("p").to_string_in(Format::Json).unwrap();
        assert!(json.contains("\"$schema\""));
        assert!(json.contains("\n  \"sessions\""));
        // Empty and false fields are omitted
        assert!(!json.contains("\"dir\""));
        assert_eq!(json.matches("\"default\"").count(), 2);
    }

    #[test]
    fn test_yaml_output_drops_schema() {
        let yaml = Template::starter("p").to_string_in(Format::Yaml).unwrap();
        assert!(!yaml.contains("$schema"));
        assert!(yaml.contains("name: editor"));

        let parsed: Template = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.sessions, Template::starter("p").sessions);
    }

    #[test]
    fn test_write_refuses_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ntmux.json");
        let template = Template::starter("p");

        write_template(&template, &path, Format::Json).unwrap();
        let written = load_template(&path, Path::new("/proj")).unwrap();
        assert_eq!(written.sessions[0].name, "p");

        let err = write_template(&template, &path, Format::Json).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists { .. }));
    }

    #[test]
    fn test_custom_template_priority() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_custom_template(tmp.path()), None);

        write(
            &tmp,
            "template.yml",
            "sessions:\n  - name: from-yml\n    windows: [{name: w}]\n",
        );
        assert_eq!(
            load_custom_template(tmp.path()).unwrap().sessions[0].name,
            "from-yml"
        );

        // Malformed higher-priority files are skipped
        write(&tmp, "template.json", "not json");
        assert_eq!(
            load_custom_template(tmp.path()).unwrap().sessions[0].name,
            "from-yml"
        );

        write(
            &tmp,
            "template.json",
            r#"{"sessions":[{"name":"from-json","windows":[{"name":"w"}]}]}"#,
        );
        assert_eq!(
            load_custom_template(tmp.path()).unwrap().sessions[0].name,
            "from-json"
        );
    }
}
