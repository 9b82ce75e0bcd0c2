//! Filesystem traversal for schema discovery

use crate::error::{Result, TypegenError};
use futures::future::{BoxFuture, FutureExt, try_join_all};
use std::path::{Path, PathBuf};

/// Recursively list every regular file at or below `path`.
///
/// A path that is not a directory comes back as a single entry. Children of a
/// directory are inspected concurrently and their results concatenated, so
/// the order follows the directory listing and is otherwise unspecified.
/// Symlinks are followed.
///
/// Returned paths are absolute. Any entry that can't be stat'ed or listed
/// fails the whole scan.
pub async fn scan(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let root = std::path::absolute(path).map_err(|e| TypegenError::filesystem(e, path))?;
    scan_path(root).await
}

fn scan_path(path: PathBuf) -> BoxFuture<'static, Result<Vec<PathBuf>>> {
    async move {
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| TypegenError::filesystem(e, &path))?;
        if !metadata.is_dir() {
            return Ok(vec![path]);
        }

        let mut entries = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| TypegenError::filesystem(e, &path))?;
        let mut children = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TypegenError::filesystem(e, &path))?
        {
            children.push(entry.path());
        }

        tracing::trace!(dir = %path.display(), children = children.len(), "scanning directory");

        let nested = try_join_all(children.into_iter().map(scan_path)).await?;
        Ok(nested.into_iter().flatten().collect())
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_scan_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Foo.json");
        fs::write(&file, "not even json").unwrap();

        let files = scan(&file).await.expect("scan file");
        assert_eq!(files, vec![file]);
    }

    #[tokio::test]
    async fn test_scan_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("top.json"), "{}").unwrap();
        fs::write(root.join("a/one.json"), "{}").unwrap();
        fs::write(root.join("a/b/two.json"), "{}").unwrap();
        fs::write(root.join("a/b/c/three.json"), "{}").unwrap();
        fs::write(root.join("a/b/c/notes.txt"), "").unwrap();

        let mut files = scan(root).await.expect("scan tree");
        files.sort();

        let mut expected = vec![
            root.join("top.json"),
            root.join("a/one.json"),
            root.join("a/b/two.json"),
            root.join("a/b/c/three.json"),
            root.join("a/b/c/notes.txt"),
        ];
        expected.sort();
        assert_eq!(files, expected);
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[tokio::test]
    async fn test_scan_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let files = scan(dir.path()).await.expect("scan empty dir");
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_scan_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = scan(&missing).await.unwrap_err();
        assert!(matches!(err, TypegenError::Filesystem { .. }));
        assert!(!err.is_recoverable());
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[tokio::test]
    async fn test_scan_relative_path_is_absolute() {
        let files = scan("src/fs.rs").await.expect("scan own source");
        assert_eq!(files.len(), 1);
        assert!(files[0].is_absolute());
        assert!(files[0].ends_with("src/fs.rs"));
    }
}
