//! Path normalization helpers.
//!
//! Dependencies are resolved lexically relative to the directory of the
//! file that references them, and repository snapshot keys are always
//! workdir-relative with forward slashes, which is what libgit2 tree
//! lookups expect on every platform.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
/// Leading `..` components that escape the path are kept as-is.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if popped {
                    normalized.pop();
                } else {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }

    normalized
}

/// Express `path` relative to the repository workdir, or `None` when it
/// lies outside the repository.
pub fn repo_relative(path: &Path, workdir: &Path) -> Option<PathBuf> {
    normalize_lexical(path)
        .strip_prefix(workdir)
        .map(PathBuf::from)
        .ok()
}

/// Render a repo-relative path with `/` separators for use as a git tree
/// lookup key.
pub fn tree_key(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_resolves_dot_and_dotdot() {
        assert_eq!(
            normalize_lexical(Path::new("/r/ch1/./figs/../intro.tex")),
            PathBuf::from("/r/ch1/intro.tex")
        );
    }

    #[test]
    fn normalize_keeps_escaping_parents() {
        assert_eq!(
            normalize_lexical(Path::new("../shared/defs.tex")),
            PathBuf::from("../shared/defs.tex")
        );
    }

    #[test]
    fn repo_relative_strips_workdir() {
        let rel = repo_relative(Path::new("/repo/ch1/a.tex"), Path::new("/repo")).unwrap();
        assert_eq!(rel, PathBuf::from("ch1/a.tex"));

        assert!(repo_relative(Path::new("/elsewhere/a.tex"), Path::new("/repo")).is_none());
    }

    #[test]
    fn tree_key_uses_forward_slashes() {
        let rel: PathBuf = ["ch1", "intro.tex"].iter().collect();
        assert_eq!(tree_key(&rel), "ch1/intro.tex");
    }
}
