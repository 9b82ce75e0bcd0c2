use miette::Diagnostic;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while running a batch generation
#[derive(Debug, Error, Diagnostic)]
pub enum TypegenError {
    /// The scan root or one of its children could not be inspected.
    ///
    /// Fatal: without a complete scan there is no corpus to resolve against.
    #[error("Failed to scan {}", path.display())]
    #[diagnostic(
        code(typegen::filesystem),
        help("Check that the schema directory exists and is readable")
    )]
    Filesystem {
        #[source]
        source: io::Error,
        /// Path that failed to stat or list
        path: PathBuf,
    },

    /// Invalid run configuration, raised before any schema is processed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// A schema file could not be read
    #[error("Failed to read schema {}", path.display())]
    #[diagnostic(code(typegen::read))]
    Read {
        #[source]
        source: io::Error,
        path: PathBuf,
    },

    /// The type generation engine rejected a schema
    #[error("Failed to generate types for {name} ({})", path.display())]
    #[diagnostic(code(typegen::generation))]
    Generation {
        #[source]
        source: GenerationError,
        /// Logical name of the request
        name: String,
        /// Schema file the request was built from
        path: PathBuf,
    },

    /// Generated output could not be written
    #[error("Failed to write {}", path.display())]
    #[diagnostic(code(typegen::write))]
    Write {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
}

impl TypegenError {
    pub fn filesystem(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Filesystem {
            source,
            path: path.into(),
        }
    }

    pub fn read(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Read {
            source,
            path: path.into(),
        }
    }

    pub fn generation(
        source: GenerationError,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self::Generation {
            source,
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn write(source: io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Write {
            source,
            path: path.into(),
        }
    }

    /// Whether the batch may continue with the next schema after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Read { .. } | Self::Generation { .. } | Self::Write { .. }
        )
    }

    /// The file this error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Filesystem { path, .. }
            | Self::Read { path, .. }
            | Self::Generation { path, .. }
            | Self::Write { path, .. } => Some(path.as_path()),
            Self::Config(ConfigError::File { path, .. }) => Some(path.as_path()),
            Self::Config(_) => None,
        }
    }
}

/// Problems with the run configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Target language selector the driver has no descriptor for
    #[error("Language {selector:?} is not supported")]
    #[diagnostic(
        code(typegen::config::unsupported_language),
        help("Supported languages: {supported}")
    )]
    UnsupportedLanguage {
        selector: String,
        /// Comma separated list of accepted selectors
        supported: String,
    },

    /// A required field is empty or malformed
    #[error("Invalid value for {field}: {message}")]
    #[diagnostic(code(typegen::config::invalid))]
    Invalid {
        field: &'static str,
        message: String,
    },

    /// The KDL config file could not be read or parsed
    #[error("Failed to load config from {}: {message}", path.display())]
    #[diagnostic(code(typegen::config::file))]
    File {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConfigError {
    pub fn unsupported_language(selector: impl Into<String>, supported: &[&str]) -> Self {
        Self::UnsupportedLanguage {
            selector: selector.into(),
            supported: supported.join(", "),
        }
    }

    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }

    pub fn file(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }
}

/// Failure reported by a [`TypeGenerator`](crate::generator::TypeGenerator).
///
/// Opaque to the pipeline: it is only logged and collected.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerationError {
    /// The generator process could not be started
    #[error("Failed to run {program}")]
    #[diagnostic(
        code(typegen::generator::spawn),
        help("Install quicktype (`npm install -g quicktype`) or point --quicktype at it")
    )]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The generator ran and reported a failure
    #[error("{program} exited with {status}: {stderr}")]
    #[diagnostic(code(typegen::generator::failed))]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Generic engine error
    #[error("{message}")]
    #[diagnostic(code(typegen::generator::error))]
    Other {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl GenerationError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type for batch operations
pub type Result<T> = std::result::Result<T, TypegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_file_errors_are_recoverable() {
        let not_found = || io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(TypegenError::read(not_found(), "a.json").is_recoverable());
        assert!(TypegenError::write(not_found(), "a.ts").is_recoverable());
        assert!(
            TypegenError::generation(GenerationError::other("bad"), "a", "a.json")
                .is_recoverable()
        );
        assert!(!TypegenError::filesystem(not_found(), "schemas").is_recoverable());
        assert!(!TypegenError::from(ConfigError::invalid("output", "empty")).is_recoverable());
    }

    #[test]
    fn unsupported_language_lists_alternatives() {
        let err = ConfigError::unsupported_language("cobol", &["ts", "swift"]);
        let help = err.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("ts, swift"));
        assert_eq!(err.to_string(), "Language \"cobol\" is not supported");
    }
}
