//! Repository snapshot access.
//!
//! A [`RepositorySnapshot`] wraps the branch-tip commit of the repository
//! containing a requested directory. The tree is resolved exactly once
//! per run and every lookup goes against that one tree, so membership and
//! cleanliness decisions cannot be made against inconsistent states even
//! if the repository moves underneath a long run.

use std::path::{Path, PathBuf};

use git2::{ObjectType, Oid, Repository, Tree};
use tracing::debug;

use crate::core::errors::{Result, TexbakeError};
use crate::core::paths::{repo_relative, tree_key};
use crate::vcs::blob::working_blob_hash;

/// Read-only view of a repository's current branch-tip tree.
pub struct RepositorySnapshot {
    repo: Repository,
    workdir: PathBuf,
    tree_id: Oid,
}

impl RepositorySnapshot {
    /// Open the repository containing `root`, walking up parent
    /// directories as needed, and capture its HEAD tree.
    pub fn discover(root: &Path) -> Result<Self> {
        let repo = Repository::discover(root).map_err(|err| TexbakeError::Repository {
            message: format!(
                "no git repository found at {} or any parent directory",
                root.display()
            ),
            source: Some(err),
        })?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| {
                TexbakeError::repository("bare repositories have no working copy to bake")
            })?
            .to_path_buf();
        // Canonicalized so candidate paths derived from a canonicalized
        // root always strip cleanly to snapshot keys.
        let workdir = workdir.canonicalize().unwrap_or(workdir);

        let tree_id = repo.head()?.peel_to_commit()?.tree_id();
        debug!(
            "using repository at {} (tip tree {tree_id})",
            workdir.display()
        );

        Ok(Self {
            repo,
            workdir,
            tree_id,
        })
    }

    /// Root of the working copy.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Express an absolute path relative to the working copy root.
    pub fn relative_to_repo(&self, path: &Path) -> Option<PathBuf> {
        repo_relative(path, &self.workdir)
    }

    fn tip_tree(&self) -> Result<Tree<'_>> {
        self.repo.find_tree(self.tree_id).map_err(Into::into)
    }

    /// Blob hash recorded for a repo-relative path in the tip tree.
    pub fn committed_hash(&self, relative: &Path) -> Option<Oid> {
        let tree = self.tip_tree().ok()?;
        let entry = tree.get_path(Path::new(&tree_key(relative))).ok()?;
        match entry.kind() {
            Some(ObjectType::Blob) => Some(entry.id()),
            _ => None,
        }
    }

    /// Whether a repo-relative path is recorded in the tip tree. Absence
    /// and lookup errors both collapse to `false`.
    pub fn is_tracked(&self, relative: &Path) -> bool {
        self.committed_hash(relative).is_some()
    }

    /// Verify the working copy of a file matches its committed blob.
    ///
    /// A path absent from the tip tree yields [`TexbakeError::UncommittedFile`],
    /// distinct from a content mismatch: by the time cleanliness is
    /// checked the file was believed tracked, and a newly added file must
    /// not silently pass.
    pub fn is_clean(&self, relative: &Path, absolute: &Path) -> Result<()> {
        let committed = self
            .committed_hash(relative)
            .ok_or_else(|| TexbakeError::UncommittedFile {
                path: relative.to_path_buf(),
            })?;

        let working = working_blob_hash(absolute)?;
        if committed == working {
            Ok(())
        } else {
            Err(TexbakeError::DirtyWorkingCopy {
                path: relative.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Initialize a repository with an initial commit of the given files.
    fn fixture(files: &[(&str, &str)]) -> (tempfile::TempDir, RepositorySnapshot) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }

        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();
        drop(tree);
        drop(repo);

        let snapshot = RepositorySnapshot::discover(dir.path()).unwrap();
        (dir, snapshot)
    }

    #[test]
    fn discover_walks_up_from_subdirectory() {
        let (dir, _) = fixture(&[("ch1/a.tex", "x")]);
        let snapshot = RepositorySnapshot::discover(&dir.path().join("ch1")).unwrap();
        assert_eq!(
            snapshot.workdir().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn discover_fails_outside_any_repository() {
        let dir = tempfile::tempdir().unwrap();
        let result = RepositorySnapshot::discover(dir.path());
        assert!(matches!(result, Err(TexbakeError::Repository { .. })));
    }

    #[test]
    fn tracked_and_untracked_membership() {
        let (dir, snapshot) = fixture(&[("a.tex", "x"), ("ch1/b.tex", "y")]);

        assert!(snapshot.is_tracked(Path::new("a.tex")));
        assert!(snapshot.is_tracked(Path::new("ch1/b.tex")));
        assert!(!snapshot.is_tracked(Path::new("missing.tex")));

        // Present on disk but never committed.
        fs::write(dir.path().join("new.tex"), "z").unwrap();
        assert!(!snapshot.is_tracked(Path::new("new.tex")));
    }

    #[test]
    fn committed_hash_matches_blob_of_content() {
        let (_dir, snapshot) = fixture(&[("a.tex", "hello\n")]);
        let committed = snapshot.committed_hash(Path::new("a.tex")).unwrap();
        let expected = crate::vcs::blob::hash_bytes(b"hello\n").unwrap();
        assert_eq!(committed, expected);
    }

    #[test]
    fn clean_file_passes() {
        let (dir, snapshot) = fixture(&[("a.tex", "hello\n")]);
        snapshot
            .is_clean(Path::new("a.tex"), &dir.path().join("a.tex"))
            .unwrap();
    }

    #[test]
    fn single_byte_mutation_is_dirty() {
        let (dir, snapshot) = fixture(&[("a.tex", "hello\n")]);
        fs::write(dir.path().join("a.tex"), "hella\n").unwrap();

        let err = snapshot
            .is_clean(Path::new("a.tex"), &dir.path().join("a.tex"))
            .unwrap_err();
        assert!(matches!(err, TexbakeError::DirtyWorkingCopy { .. }));
    }

    #[test]
    fn uncommitted_file_is_not_silently_clean() {
        let (dir, snapshot) = fixture(&[("a.tex", "x")]);
        fs::write(dir.path().join("new.tex"), "z").unwrap();

        let err = snapshot
            .is_clean(Path::new("new.tex"), &dir.path().join("new.tex"))
            .unwrap_err();
        assert!(matches!(err, TexbakeError::UncommittedFile { .. }));
    }

    #[test]
    fn snapshot_is_pinned_to_the_tip_at_open_time() {
        let (dir, snapshot) = fixture(&[("a.tex", "one\n")]);

        // Commit a change after the snapshot was taken.
        let repo = Repository::open(dir.path()).unwrap();
        fs::write(dir.path().join("a.tex"), "two\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("a.tex")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
        let parent = repo.head().unwrap().peel_to_commit().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "update", &tree, &[&parent])
            .unwrap();

        let pinned = snapshot.committed_hash(Path::new("a.tex")).unwrap();
        assert_eq!(pinned, crate::vcs::blob::hash_bytes(b"one\n").unwrap());
    }
}
