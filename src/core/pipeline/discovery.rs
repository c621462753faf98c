//! Candidate discovery.
//!
//! Walks the requested directory for files carrying the source extension,
//! honoring repository ignore rules and configured exclude globs. The
//! output is sorted and duplicate-free so every later stage sees a stable
//! order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::core::config::DiscoveryConfig;
use crate::core::errors::{Result, TexbakeError};

/// Discover candidate source files under `root`.
pub fn discover_candidates(root: &Path, config: &DiscoveryConfig) -> Result<Vec<PathBuf>> {
    let root = fs::canonicalize(root).map_err(|err| TexbakeError::io_at(root, err))?;
    let exclude_glob = compile_excludes(&config.exclude_patterns)?;

    let walker = WalkBuilder::new(&root)
        .standard_filters(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .hidden(true)
        .build();

    let mut unique = HashSet::new();
    let mut collected = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("failed to walk directory entry: {err}");
                continue;
            }
        };

        let is_file = entry.file_type().is_some_and(|ft| ft.is_file());
        if !is_file {
            continue;
        }

        let path = entry.path();
        if should_keep(path, &root, config, exclude_glob.as_ref()) && unique.insert(path.to_path_buf()) {
            collected.push(path.to_path_buf());
        }
    }

    collected.sort();
    debug!(
        "discovered {} candidate .{} files under {}",
        collected.len(),
        config.source_extension,
        root.display()
    );
    Ok(collected)
}

fn should_keep(
    path: &Path,
    root: &Path,
    config: &DiscoveryConfig,
    exclude_glob: Option<&GlobSet>,
) -> bool {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&config.source_extension));
    if !has_extension {
        return false;
    }

    if config.max_file_size_bytes > 0 {
        if let Ok(metadata) = fs::metadata(path) {
            if metadata.len() > config.max_file_size_bytes {
                debug!(
                    "skipping oversized candidate {} ({} bytes)",
                    path.display(),
                    metadata.len()
                );
                return false;
            }
        }
    }

    if let Some(exclude) = exclude_glob {
        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude.is_match(relative) {
            return false;
        }
    }

    true
}

fn compile_excludes(patterns: &[String]) -> Result<Option<GlobSet>> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;

    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            continue;
        }

        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|err| {
                TexbakeError::config_field(
                    format!("Invalid glob pattern '{pattern}': {err}"),
                    "discovery.exclude_patterns",
                )
            })?;
        builder.add(glob);
        added = true;
    }

    if added {
        builder
            .build()
            .map(Some)
            .map_err(|err| TexbakeError::config(format!("Failed to build glob set: {err}")))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_only_matching_extension_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("ch2")).unwrap();
        fs::write(dir.path().join("b.tex"), "x").unwrap();
        fs::write(dir.path().join("a.tex"), "x").unwrap();
        fs::write(dir.path().join("notes.md"), "x").unwrap();
        fs::write(dir.path().join("ch2/c.tex"), "x").unwrap();

        let found = discover_candidates(dir.path(), &DiscoveryConfig::default()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(dir.path().canonicalize().unwrap()).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("a.tex"),
                Path::new("b.tex"),
                Path::new("ch2/c.tex")
            ]
        );
    }

    #[test]
    fn exclude_patterns_filter_candidates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("drafts")).unwrap();
        fs::write(dir.path().join("keep.tex"), "x").unwrap();
        fs::write(dir.path().join("drafts/wip.tex"), "x").unwrap();

        let config = DiscoveryConfig {
            exclude_patterns: vec!["drafts/**".to_string()],
            ..DiscoveryConfig::default()
        };
        let found = discover_candidates(dir.path(), &config).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("keep.tex"));
    }

    #[test]
    fn oversized_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.tex"), vec![b'x'; 64]).unwrap();
        fs::write(dir.path().join("small.tex"), "x").unwrap();

        let config = DiscoveryConfig {
            max_file_size_bytes: 16,
            ..DiscoveryConfig::default()
        };
        let found = discover_candidates(dir.path(), &config).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("small.tex"));
    }

    #[test]
    fn invalid_exclude_glob_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = DiscoveryConfig {
            exclude_patterns: vec!["[invalid".to_string()],
            ..DiscoveryConfig::default()
        };
        let err = discover_candidates(dir.path(), &config).unwrap_err();
        assert!(matches!(err, TexbakeError::Config { .. }));
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            discover_candidates(&dir.path().join("nope"), &DiscoveryConfig::default()).unwrap_err();
        assert!(matches!(err, TexbakeError::Io { .. }));
    }
}
