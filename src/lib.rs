//! # Texbake: incremental build resolver for TeX document trees
//!
//! Texbake decides which documents in a git-backed directory tree are
//! stale and must be recompiled to their output artifacts. Given a
//! directory, it:
//!
//! - discovers candidate source files,
//! - classifies each as a genuine compilable document or a fragment,
//! - keeps only files tracked in the repository's branch-tip commit,
//! - resolves each document's include directives into a dependency list,
//! - compares modification times against the output artifact,
//! - and verifies the working copy exactly matches the committed content
//!   before authorizing compilation.
//!
//! Soft exclusions (fragments, untracked files) are reported as
//! diagnostics; a missing dependency or a dirty working copy aborts the
//! entire run with no partial result.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use texbake::{resolve_directory, BakeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BakeConfig::default();
//!     let resolution = resolve_directory(std::path::Path::new("."), &config).await?;
//!
//!     for path in &resolution.needs_compilation {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

/// Core resolution logic and data structures.
pub mod core {
    pub mod classify;
    pub mod config;
    pub mod deps;
    pub mod errors;
    pub mod paths;
    pub mod pipeline;
    pub mod staleness;
    pub mod text;
}

/// Version-control access: branch-tip snapshot and blob hashing.
pub mod vcs {
    pub mod blob;
    pub mod snapshot;
}

pub use crate::core::config::BakeConfig;
pub use crate::core::errors::{Result, TexbakeError};
pub use crate::core::pipeline::{resolve, resolve_directory, Resolution};
pub use crate::vcs::snapshot::RepositorySnapshot;
