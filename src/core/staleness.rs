//! Staleness evaluation.
//!
//! A document is up to date when neither it nor any of its dependencies
//! has been modified after its output artifact. A missing artifact is
//! treated as infinitely old, which forces compilation. A missing
//! dependency here is a fatal I/O error: extraction already confirmed it
//! existed, so its disappearance means the run is racing something else.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::errors::{Result, TexbakeError};

/// Derive the output artifact path for a source file by extension
/// substitution.
pub fn artifact_path(source: &Path, artifact_extension: &str) -> PathBuf {
    source.with_extension(artifact_extension)
}

/// Modification time of a file that must exist. Any failure, including
/// absence, is fatal.
async fn required_mtime(path: &Path) -> Result<SystemTime> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|err| TexbakeError::io_at(path, err))?;
    metadata.modified().map_err(|err| TexbakeError::io_at(path, err))
}

/// Modification time of the output artifact. Absence maps to the epoch;
/// any other failure is fatal.
async fn artifact_mtime(path: &Path) -> Result<SystemTime> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.modified().map_err(|err| TexbakeError::io_at(path, err)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(SystemTime::UNIX_EPOCH),
        Err(err) => Err(TexbakeError::io_at(path, err)),
    }
}

/// Decide whether `source` is up to date with respect to `output`.
///
/// Ties count as up to date; only a strictly newer source or dependency
/// forces recompilation.
pub async fn is_up_to_date(source: &Path, output: &Path, dependencies: &[PathBuf]) -> Result<bool> {
    let source_mtime = required_mtime(source).await?;
    let output_mtime = artifact_mtime(output).await?;

    if source_mtime > output_mtime {
        return Ok(false);
    }

    for dependency in dependencies {
        if required_mtime(dependency).await? > output_mtime {
            return Ok(false);
        }
    }

    Ok(true)
}
