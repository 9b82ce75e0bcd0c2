use crate::error::{Result, TypegenError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Every schema document discovered under a root, available for `$ref` resolution.
///
/// The corpus is deliberately unfiltered: excluded schemas are never generated
/// but other schemas may still reference them.
#[derive(Debug, Clone, Default)]
pub struct SchemaCorpus {
    /// Directory the corpus was scanned from; exclusion markers are matched
    /// below it
    root: Option<PathBuf>,
    /// Absolute paths, ordered
    paths: BTreeSet<PathBuf>,
}

impl SchemaCorpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` and collect every file beneath it
    pub async fn build(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::path::absolute(root).map_err(|e| TypegenError::filesystem(e, root))?;
        let files = crate::fs::scan(&root).await?;
        Ok(Self {
            root: Some(root),
            ..Self::from_paths(files)
        })
    }

    /// Build a corpus from already discovered paths.
    ///
    /// Without a scan root, exclusion markers see the full path.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            root: None,
            paths: paths.into_iter().collect(),
        }
    }

    /// The generation worklist: every schema whose path below the scan root
    /// contains none of `exclusions`
    pub fn schema_files(&self, exclusions: &[String]) -> Vec<SchemaFile> {
        self.paths
            .iter()
            .filter(|path| !is_excluded(self.relative(path), exclusions))
            .map(|path| SchemaFile::new(path.clone()))
            .collect()
    }

    /// `path` below the scan root. A corpus scanned from a single file keeps
    /// that file's name.
    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        let Some(root) = &self.root else {
            return path;
        };
        match path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => path.file_name().map(Path::new).unwrap_or(path),
        }
    }

    /// Check if a path is part of the corpus
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.paths.contains(path.as_ref())
    }

    /// Iterate over all schema paths in order
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// Number of schema documents
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if corpus is empty
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Substring match of any marker against `path`
pub fn is_excluded(path: &Path, exclusions: &[String]) -> bool {
    let path = path.to_string_lossy();
    exclusions
        .iter()
        .any(|marker| !marker.is_empty() && path.contains(marker.as_str()))
}

/// One schema document scheduled for generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFile {
    pub path: PathBuf,
    /// File name without its extension; the generation key and output base name
    pub name: String,
}

impl SchemaFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}
