use crate::error::{Result, TypegenError};
use std::path::{Path, PathBuf};

/// Writes generated sources into a single output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    extension: &'static str,
}

impl OutputWriter {
    /// Create the output directory if needed.
    ///
    /// Failing here is fatal for the run: nothing could be written anyway.
    pub async fn create(dir: impl Into<PathBuf>, extension: &'static str) -> Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| TypegenError::filesystem(e, &dir))?;
        Ok(Self { dir, extension })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<name>.<extension>`
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, self.extension))
    }

    /// Join `lines` with newlines and write them, replacing any existing file
    pub async fn write(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self.path_for(name);
        tokio::fs::write(&path, lines.join("\n"))
            .await
            .map_err(|e| TypegenError::write(e, &path))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("result");

        OutputWriter::create(&out, "ts").await.expect("first create");
        let writer = OutputWriter::create(&out, "ts").await.expect("second create");
        assert!(out.is_dir());
        assert_eq!(writer.dir(), out.as_path());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::create(dir.path(), "ts").await.unwrap();

        let first = writer
            .write("Foo", &["export type Foo = {".to_string(), "};".to_string()])
            .await
            .unwrap();
        assert_eq!(first, dir.path().join("Foo.ts"));
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "export type Foo = {\n};");

        writer.write("Foo", &["// empty".to_string()]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "// empty");
    }

    #[tokio::test]
    async fn test_write_into_removed_dir_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gone");
        let writer = OutputWriter::create(&out, "swift").await.unwrap();
        std::fs::remove_dir(&out).unwrap();

        let err = writer.write("Foo", &[]).await.unwrap_err();
        assert!(matches!(err, TypegenError::Write { .. }));
        assert_eq!(err.path(), Some(out.join("Foo.swift").as_path()));
    }
}
