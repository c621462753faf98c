//! Result types for build resolution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why a candidate was excluded without aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Carries the source extension but is not a genuine compilable
    /// document.
    NotDocument,
    /// Not recorded in the branch-tip tree.
    Untracked,
}

/// A soft exclusion recorded during resolution. Collected in the report
/// and logged once by the caller instead of threading a logger through
/// every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Absolute path of the excluded candidate
    pub path: PathBuf,
    /// Why it was excluded
    pub reason: ExclusionReason,
}

impl Diagnostic {
    pub(crate) fn new(path: PathBuf, reason: ExclusionReason) -> Self {
        Self { path, reason }
    }
}

/// Outcome of a complete resolution run.
///
/// Produced only when the run finishes without a fatal condition; a run
/// that aborts yields an error and no partial list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// Directory the resolution was requested for
    pub root: PathBuf,
    /// Number of candidates found during discovery
    pub discovered: usize,
    /// Documents that are stale and clean, authorized for compilation,
    /// in discovery order
    pub needs_compilation: Vec<PathBuf>,
    /// Documents whose output artifacts are current, in discovery order
    pub up_to_date: Vec<PathBuf>,
    /// Soft exclusions, in discovery order
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Number of excluded candidates with the given reason.
    pub fn excluded(&self, reason: ExclusionReason) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.reason == reason)
            .count()
    }
}
