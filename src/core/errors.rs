//! Error types for the texbake library.
//!
//! Structured error types for every stage of build resolution, with
//! constructor helpers so call sites stay terse and context is preserved
//! through the pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main result type for texbake operations.
pub type Result<T> = std::result::Result<T, TexbakeError>;

/// Comprehensive error type for all texbake operations.
#[derive(Error, Debug)]
pub enum TexbakeError {
    /// I/O related errors (stat, read, walk).
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors.
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Version-control access errors (open, HEAD resolution, tree lookups).
    #[error("Repository error: {message}")]
    Repository {
        /// Error description
        message: String,
        /// Underlying libgit2 error, when one exists
        #[source]
        source: Option<git2::Error>,
    },

    /// A referenced include could not be located on disk in either its
    /// literal or extension-augmented form.
    #[error("missing dependency '{}' referenced from {}", .reference, .source_file.display())]
    MissingDependency {
        /// File containing the directive
        source_file: PathBuf,
        /// The directive argument as written
        reference: String,
        /// Paths that were tried, in order
        tried: Vec<PathBuf>,
    },

    /// Working-copy content does not match the committed blob.
    #[error("working copy of {} differs from the committed content", .path.display())]
    DirtyWorkingCopy {
        /// Repo-relative path of the offending file
        path: PathBuf,
    },

    /// The path is absent from the branch-tip tree, so cleanliness is
    /// undefined. Distinct from a hash mismatch: a newly added file must
    /// not silently count as clean.
    #[error("{} is not present in the current commit; commit it before baking", .path.display())]
    UncommittedFile {
        /// Repo-relative path of the offending file
        path: PathBuf,
    },

    /// Resolution pipeline errors.
    #[error("Pipeline error at stage '{stage}': {message}")]
    Pipeline {
        /// Pipeline stage where the error occurred
        stage: String,
        /// Error description
        message: String,
    },

    /// Serialization/deserialization errors.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TexbakeError {
    /// Create a new I/O error with context.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// I/O error while statting or reading a specific path.
    pub fn io_at(path: &Path, source: io::Error) -> Self {
        Self::Io {
            message: format!("failed to access {}", path.display()),
            source,
        }
    }

    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context.
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new repository error without a libgit2 source.
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new pipeline error.
    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pipeline {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

impl From<io::Error> for TexbakeError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<git2::Error> for TexbakeError {
    fn from(err: git2::Error) -> Self {
        Self::Repository {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for TexbakeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for TexbakeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}
