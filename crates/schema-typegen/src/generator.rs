//! The boundary to the type generation engine.
//!
//! Parsing JSON Schema, resolving references and rendering the target
//! language are all the engine's job. The pipeline only hands it one
//! [`GenerationRequest`] at a time and collects the lines it produces.

use crate::error::GenerationError;
use crate::request::GenerationRequest;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// A type generation engine.
///
/// Takes `&mut self` because engines may keep a schema store that caches
/// fetched references; requests against one engine never overlap.
#[async_trait]
pub trait TypeGenerator: Send {
    /// Generate source lines for a single named schema
    async fn generate(
        &mut self,
        request: &GenerationRequest<'_>,
    ) -> Result<Vec<String>, GenerationError>;
}

#[async_trait]
impl<G: TypeGenerator + ?Sized> TypeGenerator for Box<G> {
    async fn generate(
        &mut self,
        request: &GenerationRequest<'_>,
    ) -> Result<Vec<String>, GenerationError> {
        (**self).generate(request).await
    }
}

/// Runs the `quicktype` command line tool, one process per request.
///
/// The schema is passed by path, not as `request.source`, so quicktype reads
/// the file itself and relative `$ref`s resolve against the file's directory.
/// `request.source` is there for in-process engines. Each corpus entry is
/// registered with `--additional-schema` so `$ref`s to sibling schemas
/// resolve. Remote references are fetched by quicktype itself.
#[derive(Debug, Clone)]
pub struct QuicktypeGenerator {
    program: PathBuf,
    extra_args: Vec<OsString>,
}

impl Default for QuicktypeGenerator {
    fn default() -> Self {
        Self::new("quicktype")
    }
}

impl QuicktypeGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments inserted before the generated ones, e.g. a script path when
    /// `program` is `node`
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Full argument list for a request
    pub fn args(&self, request: &GenerationRequest<'_>) -> Vec<OsString> {
        let mut args = self.extra_args.clone();
        args.push("--lang".into());
        args.push(request.language.quicktype_name().into());
        args.push("--src-lang".into());
        args.push("schema".into());
        args.push("--top-level".into());
        args.push(request.name.clone().into());

        for option in request.options.enabled_for(request.language) {
            args.push(format!("--{}", option.name()).into());
        }

        for schema in request.corpus.iter() {
            if schema == request.path {
                continue;
            }
            args.push("--additional-schema".into());
            args.push(schema.as_os_str().to_owned());
        }

        args.push(request.path.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl TypeGenerator for QuicktypeGenerator {
    async fn generate(
        &mut self,
        request: &GenerationRequest<'_>,
    ) -> Result<Vec<String>, GenerationError> {
        let program = self.program.display().to_string();
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::debug!(name = %request.name, program = %program, "invoking generator");

        let output = cmd
            .output()
            .await
            .map_err(|source| GenerationError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GenerationError::Failed {
                program,
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|e| GenerationError::Other {
            message: format!("{program} produced output that is not UTF-8"),
            source: Some(Box::new(e)),
        })?;

        Ok(stdout.lines().map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{SchemaCorpus, SchemaFile};
    use crate::request::{RendererOptions, TargetLanguage};

    fn request<'c>(
        file: &'c SchemaFile,
        corpus: &'c SchemaCorpus,
        language: TargetLanguage,
    ) -> GenerationRequest<'c> {
        GenerationRequest {
            name: file.name.clone(),
            path: &file.path,
            source: String::new(),
            corpus,
            language,
            options: RendererOptions::default(),
        }
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_quicktype_args() {
        let corpus = SchemaCorpus::from_paths([
            PathBuf::from("/s/A.json"),
            PathBuf::from("/s/B.json"),
            PathBuf::from("/s/ignoreMe.json"),
        ]);
        let file = SchemaFile::new(PathBuf::from("/s/A.json"));
        let args = strings(QuicktypeGenerator::default().args(&request(
            &file,
            &corpus,
            TargetLanguage::TypeScript,
        )));

        assert_eq!(
            args,
            vec![
                "--lang",
                "typescript",
                "--src-lang",
                "schema",
                "--top-level",
                "A",
                "--just-types",
                "--prefer-types",
                "--prefer-const-values",
                "--additional-schema",
                "/s/B.json",
                "--additional-schema",
                "/s/ignoreMe.json",
                "/s/A.json",
            ]
        );
    }

    #[test]
    fn test_swift_drops_typescript_only_flags() {
        let corpus = SchemaCorpus::from_paths([PathBuf::from("/s/A.json")]);
        let file = SchemaFile::new(PathBuf::from("/s/A.json"));
        let args = strings(
            QuicktypeGenerator::new("node")
                .with_args(["quicktype.js"])
                .args(&request(&file, &corpus, TargetLanguage::Swift)),
        );

        assert_eq!(args[0], "quicktype.js");
        assert!(args.contains(&"swift".to_string()));
        assert!(args.contains(&"--just-types".to_string()));
        assert!(!args.contains(&"--prefer-types".to_string()));
        assert!(!args.contains(&"--additional-schema".to_string()));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let corpus = SchemaCorpus::from_paths([PathBuf::from("/s/A.json")]);
        let file = SchemaFile::new(PathBuf::from("/s/A.json"));
        let mut generator = QuicktypeGenerator::new("/nonexistent/quicktype-binary");

        let err = generator
            .generate(&request(&file, &corpus, TargetLanguage::TypeScript))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Spawn { .. }));
    }
}
