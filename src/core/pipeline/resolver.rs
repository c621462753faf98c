//! Build resolution orchestrator.
//!
//! Threads an immutable per-file record through the stage sequence:
//! discovery, classification, repository membership, dependency
//! extraction, staleness evaluation, cleanliness verification. Soft
//! exclusions become diagnostics in the final [`Resolution`]; the first
//! fatal condition aborts the whole run and no partial list is returned.
//!
//! Per-file checks inside a stage run concurrently under a semaphore
//! bounded by the configured job limit. `join_all` yields results in
//! input order, so every stage's output preserves discovery order, and a
//! batch always runs to completion before any of its errors surface.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::core::classify::{classify_content, Classification, DocumentRules};
use crate::core::config::BakeConfig;
use crate::core::deps::{extract_from_content, DependencyRules};
use crate::core::errors::{Result, TexbakeError};
use crate::core::pipeline::discovery::discover_candidates;
use crate::core::pipeline::report::{Diagnostic, ExclusionReason, Resolution};
use crate::core::staleness::{artifact_path, is_up_to_date};
use crate::vcs::blob::hash_bytes;
use crate::vcs::snapshot::RepositorySnapshot;

/// A candidate that survived classification and membership filtering.
#[derive(Debug, Clone)]
struct TrackedDocument {
    /// Absolute path on disk
    path: PathBuf,
    /// Path relative to the repository workdir
    relative: PathBuf,
}

/// A tracked document with its resolved dependency list and derived
/// output artifact.
#[derive(Debug, Clone)]
struct ReadyDocument {
    doc: TrackedDocument,
    dependencies: Vec<PathBuf>,
    artifact: PathBuf,
}

/// Resolve which documents under `root` need compilation, opening the
/// repository snapshot internally.
pub async fn resolve_directory(root: &Path, config: &BakeConfig) -> Result<Resolution> {
    let snapshot = RepositorySnapshot::discover(root)?;
    resolve(root, config, &snapshot).await
}

/// Resolve which documents under `root` need compilation against an
/// already-opened repository snapshot.
pub async fn resolve(
    root: &Path,
    config: &BakeConfig,
    snapshot: &RepositorySnapshot,
) -> Result<Resolution> {
    config.validate()?;
    let jobs = config.performance.jobs;

    // Canonicalized up front so reported paths and snapshot keys agree.
    let root = std::fs::canonicalize(root).map_err(|err| TexbakeError::io_at(root, err))?;

    let candidates = discover_candidates(&root, &config.discovery)?;
    let discovered = candidates.len();
    info!("discovered {discovered} candidate files");

    let mut diagnostics = Vec::new();

    let documents = classify_stage(candidates, config, jobs, &mut diagnostics).await;
    info!("{} candidates are genuine documents", documents.len());

    let tracked = membership_stage(documents, snapshot, &mut diagnostics);
    info!("{} documents are tracked in the current commit", tracked.len());

    let ready = dependency_stage(tracked, config, jobs).await?;

    let (stale, up_to_date) = staleness_stage(ready, jobs).await?;
    info!(
        "{} documents are stale, {} are up to date",
        stale.len(),
        up_to_date.len()
    );

    cleanliness_stage(&stale, snapshot, jobs).await?;

    Ok(Resolution {
        root,
        discovered,
        needs_compilation: stale.into_iter().map(|d| d.doc.path).collect(),
        up_to_date: up_to_date.into_iter().map(|d| d.doc.path).collect(),
        diagnostics,
    })
}

/// Run `op` over `items` with at most `jobs` in flight, preserving input
/// order in the output.
async fn run_bounded<T, R, F, Fut>(items: Vec<T>, jobs: usize, op: F) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let semaphore = Arc::new(Semaphore::new(jobs));
    let tasks: Vec<_> = items
        .into_iter()
        .map(|item| {
            let semaphore = Arc::clone(&semaphore);
            let work = op(item);
            async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .unwrap_or_else(|_| unreachable!("job semaphore is never closed"));
                work.await
            }
        })
        .collect();

    future::join_all(tasks).await
}

/// Filter candidates to genuine documents. Unreadable or marker-less
/// files are soft exclusions, never fatal.
async fn classify_stage(
    candidates: Vec<PathBuf>,
    config: &BakeConfig,
    jobs: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<PathBuf> {
    let rules = DocumentRules::from_config(&config.document, &config.discovery);

    let classified = run_bounded(candidates, jobs, |path| {
        let rules = rules.clone();
        async move {
            let classification = match tokio::fs::read_to_string(&path).await {
                Ok(content) => classify_content(&content, &rules),
                Err(err) => {
                    debug!("cannot read {} for classification: {err}", path.display());
                    Classification::NotDocument
                }
            };
            (path, classification)
        }
    })
    .await;

    let mut documents = Vec::new();
    for (path, classification) in classified {
        match classification {
            Classification::Document => documents.push(path),
            Classification::NotDocument => {
                debug!("{} is not a compilable document; skipping", path.display());
                diagnostics.push(Diagnostic::new(path, ExclusionReason::NotDocument));
            }
        }
    }
    documents
}

/// Filter documents to those recorded in the branch-tip tree. Untracked
/// documents are soft exclusions, logged with a warning.
fn membership_stage(
    documents: Vec<PathBuf>,
    snapshot: &RepositorySnapshot,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<TrackedDocument> {
    let mut tracked = Vec::new();

    for path in documents {
        let relative = snapshot.relative_to_repo(&path);
        match relative {
            Some(relative) if snapshot.is_tracked(&relative) => {
                tracked.push(TrackedDocument { path, relative });
            }
            _ => {
                warn!(
                    "{} is not in the repository; it will NOT be compiled",
                    path.display()
                );
                diagnostics.push(Diagnostic::new(path, ExclusionReason::Untracked));
            }
        }
    }

    tracked
}

/// Attach the resolved dependency list to every tracked document. A
/// missing dependency aborts the run once the batch completes.
async fn dependency_stage(
    tracked: Vec<TrackedDocument>,
    config: &BakeConfig,
    jobs: usize,
) -> Result<Vec<ReadyDocument>> {
    let rules = DependencyRules::from_config(&config.dependencies)?;
    let artifact_extension = config.output.artifact_extension.clone();

    let extracted = run_bounded(tracked, jobs, |doc| {
        let rules = rules.clone();
        let artifact_extension = artifact_extension.clone();
        async move {
            let content = tokio::fs::read_to_string(&doc.path)
                .await
                .map_err(|err| TexbakeError::io_at(&doc.path, err))?;
            let dependencies = extract_from_content(&doc.path, &content, &rules)?;
            let artifact = artifact_path(&doc.path, &artifact_extension);
            Ok::<_, TexbakeError>(ReadyDocument {
                doc,
                dependencies,
                artifact,
            })
        }
    })
    .await;

    extracted.into_iter().collect()
}

/// Split ready documents into stale and up to date, preserving order
/// within each group.
async fn staleness_stage(
    ready: Vec<ReadyDocument>,
    jobs: usize,
) -> Result<(Vec<ReadyDocument>, Vec<ReadyDocument>)> {
    let evaluated = run_bounded(ready, jobs, |doc| async move {
        let current = is_up_to_date(&doc.doc.path, &doc.artifact, &doc.dependencies).await?;
        Ok::<_, TexbakeError>((doc, current))
    })
    .await;

    let mut stale = Vec::new();
    let mut up_to_date = Vec::new();
    for result in evaluated {
        let (doc, current) = result?;
        if current {
            up_to_date.push(doc);
        } else {
            stale.push(doc);
        }
    }
    Ok((stale, up_to_date))
}

/// Verify every stale document's working copy matches its committed
/// blob. Any mismatch, or a path missing from the tip tree, aborts the
/// run; cleanliness failures are never per-file exclusions.
async fn cleanliness_stage(
    stale: &[ReadyDocument],
    snapshot: &RepositorySnapshot,
    jobs: usize,
) -> Result<()> {
    let working_hashes = run_bounded(stale.to_vec(), jobs, |doc| async move {
        let bytes = tokio::fs::read(&doc.doc.path)
            .await
            .map_err(|err| TexbakeError::io_at(&doc.doc.path, err))?;
        hash_bytes(&bytes)
    })
    .await;

    for (doc, working) in stale.iter().zip(working_hashes) {
        let working = working?;
        let committed = snapshot.committed_hash(&doc.doc.relative).ok_or_else(|| {
            TexbakeError::UncommittedFile {
                path: doc.doc.relative.clone(),
            }
        })?;

        if committed != working {
            return Err(TexbakeError::DirtyWorkingCopy {
                path: doc.doc.relative.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_bounded_preserves_input_order() {
        // Later items finish first; the output must still follow input order.
        let delays = vec![(1u64, 30u64), (2, 20), (3, 10)];
        let results = run_bounded(delays, 3, |(id, millis)| async move {
            tokio::time::sleep(std::time::Duration::from_millis(millis)).await;
            id
        })
        .await;
        assert_eq!(results, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn run_bounded_caps_in_flight_work() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);
        static PEAK: AtomicUsize = AtomicUsize::new(0);

        let items: Vec<usize> = (0..16).collect();
        run_bounded(items, 2, |_| async {
            let now = IN_FLIGHT.fetch_add(1, Ordering::SeqCst) + 1;
            PEAK.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            IN_FLIGHT.fetch_sub(1, Ordering::SeqCst);
        })
        .await;

        assert!(PEAK.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn run_bounded_runs_whole_batch_despite_failures() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static COMPLETED: AtomicUsize = AtomicUsize::new(0);

        let items: Vec<usize> = (0..8).collect();
        let results = run_bounded(items, 2, |n| async move {
            COMPLETED.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(TexbakeError::pipeline("test", "boom"))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(COMPLETED.load(Ordering::SeqCst), 8);
        assert!(results[0].is_err());
        assert!(results[1..].iter().all(|r| r.is_ok()));
    }
}
