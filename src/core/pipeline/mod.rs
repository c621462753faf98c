//! Build resolution pipeline.
//!
//! Orchestrates the stage sequence that decides which documents need
//! compilation:
//!
//! 1. **Discovery**: find candidate source files under the requested root
//! 2. **Classification**: keep only genuine compilable documents
//! 3. **Membership**: keep only files tracked in the branch-tip tree
//! 4. **Dependencies**: resolve transitive include directives
//! 5. **Staleness**: drop documents whose artifacts are current
//! 6. **Cleanliness**: verify working copies match committed content
//!
//! Stages 2 and later run their per-file checks with bounded parallelism
//! while preserving discovery order. The output is a [`Resolution`] with
//! the authorized file list and the soft-exclusion diagnostics, or an
//! error when any fatal condition aborts the run.

pub use discovery::discover_candidates;
pub use report::{Diagnostic, ExclusionReason, Resolution};
pub use resolver::{resolve, resolve_directory};

mod discovery;
mod report;
mod resolver;
