//! Error types for template loading and writing.

use std::path::PathBuf;

/// Result alias for template operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading, validating, or writing a template
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("session '{session}' has no windows")]
    EmptySession { session: String },

    #[error("{} already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("cannot write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize template: {0}")]
    Serialize(String),
}
