//! The batch pipeline: scan, build the corpus, generate every eligible schema
//! one after the other, write the results and collect failures.

use crate::config::BatchConfig;
use crate::corpus::{SchemaCorpus, SchemaFile};
use crate::error::{Result, TypegenError};
use crate::generator::{QuicktypeGenerator, TypeGenerator};
use crate::output::OutputWriter;
use crate::request::{GenerationRequest, TargetLanguage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Outcome of one batch run
#[derive(Debug, Default)]
pub struct BatchRun {
    /// Schemas in the corpus that matched an exclusion marker
    pub skipped: usize,
    /// Output files written, in generation order
    pub written: Vec<PathBuf>,
    /// Per-schema failures, in generation order
    pub failures: Vec<TypegenError>,
}

impl BatchRun {
    /// Number of schemas a generation was attempted for
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    pub fn succeeded(&self) -> usize {
        self.written.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempted schema was generated
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether the process should exit non-zero. Per-schema failures only
    /// count when `fail_on_error` is set.
    pub fn should_fail(&self, fail_on_error: bool) -> bool {
        fail_on_error && !self.is_clean()
    }

    fn report(&self) {
        if self.failures.is_empty() {
            tracing::info!(
                generated = self.succeeded(),
                skipped = self.skipped,
                "generated all types"
            );
            return;
        }

        tracing::error!(
            failed = self.failed(),
            generated = self.succeeded(),
            skipped = self.skipped,
            "failed to generate {} types",
            self.failed()
        );
        for failure in &self.failures {
            tracing::error!(error = %error_chain(failure), "  {}", failure);
        }
    }
}

/// Runs batches against one type generator.
///
/// The generator sits behind a mutex that is held for the whole of each
/// request, so generations never overlap even when the pipeline is shared.
pub struct Pipeline<G> {
    generator: Mutex<G>,
}

impl<G: TypeGenerator> Pipeline<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator: Mutex::new(generator),
        }
    }

    pub fn into_inner(self) -> G {
        self.generator.into_inner()
    }

    /// Generate types for every schema under `config.schemas_dir()`.
    ///
    /// Only configuration and scan problems are returned as errors. Failures
    /// for individual schemas are logged, collected in the returned
    /// [`BatchRun`], and never stop the run.
    pub async fn run(&self, config: &BatchConfig) -> Result<BatchRun> {
        config.validate()?;

        let schemas_dir = config.schemas_dir();
        tracing::info!(dir = %schemas_dir.display(), "loading schemas");
        let corpus = SchemaCorpus::build(&schemas_dir).await?;
        let worklist = corpus.schema_files(&config.exclude);
        tracing::info!(
            schemas = corpus.len(),
            eligible = worklist.len(),
            language = %config.language,
            "loaded schema corpus"
        );
        warn_name_collisions(&worklist);

        let writer = OutputWriter::create(config.output_dir(), config.language.extension()).await?;

        let mut run = BatchRun {
            skipped: corpus.len() - worklist.len(),
            ..Default::default()
        };

        for file in &worklist {
            match self.generate_one(file, &corpus, config, &writer).await {
                Ok(path) => {
                    tracing::info!(
                        name = %file.name,
                        output = %path.display(),
                        "generated types"
                    );
                    run.written.push(path);
                }
                Err(err) => {
                    tracing::error!(
                        path = %file.path.display(),
                        error = %error_chain(&err),
                        "could not generate types"
                    );
                    run.failures.push(err);
                }
            }
        }

        run.report();
        Ok(run)
    }

    async fn generate_one(
        &self,
        file: &SchemaFile,
        corpus: &SchemaCorpus,
        config: &BatchConfig,
        writer: &OutputWriter,
    ) -> Result<PathBuf> {
        let request =
            GenerationRequest::build(file, corpus, config.language, config.renderer).await?;

        let lines = {
            let mut generator = self.generator.lock().await;
            generator
                .generate(&request)
                .await
                .map_err(|e| TypegenError::generation(e, &file.name, &file.path))?
        };

        writer.write(&file.name, &lines).await
    }
}

/// Run a batch with the default `quicktype` generator.
///
/// Reads schemas from `<root>/schemas` and writes `<root>/<output>/<name>.<ext>`.
/// The language selector is checked before anything touches the filesystem.
pub async fn generate_types(
    root: impl AsRef<Path>,
    output: impl Into<PathBuf>,
    language: &str,
) -> Result<BatchRun> {
    let language: TargetLanguage = language.parse()?;
    let mut config = BatchConfig::new(root.as_ref());
    config.output = output.into();
    config.language = language;

    Pipeline::new(QuicktypeGenerator::default())
        .run(&config)
        .await
}

/// Logical names are not disambiguated; the later schema's output wins
fn warn_name_collisions(worklist: &[SchemaFile]) {
    let mut seen: HashMap<&str, &Path> = HashMap::new();
    for file in worklist {
        if let Some(previous) = seen.insert(&file.name, &file.path) {
            tracing::warn!(
                name = %file.name,
                first = %previous.display(),
                second = %file.path.display(),
                "two schemas share a name, the later output overwrites the earlier"
            );
        }
    }
}

/// `error: cause: cause`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
