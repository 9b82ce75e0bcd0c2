//! Run configuration, optionally loaded from a KDL file.
//!
//! ```kdl
//! schemas "schemas"
//! output "api"
//! language "ts"
//! exclude "ignore"
//! exclude "draft"
//! quicktype "node_modules/.bin/quicktype"
//! renderer {
//!     just-types #true
//!     prefer-unions #false
//! }
//! ```

use crate::cli::TypegenArgs;
use crate::error::ConfigError;
use crate::request::{RendererOption, RendererOptions, TargetLanguage};
use std::path::{Component, Path, PathBuf};

/// Default config file name, looked up in the run root
pub const CONFIG_FILE_NAME: &str = "typegen.kdl";

/// Program run when neither the flags nor the config file name one
pub const DEFAULT_QUICKTYPE: &str = "quicktype";

/// Config file to read: `--config` if given (it must exist), otherwise
/// `<ROOT>/typegen.kdl` when that file is present
pub fn config_path(args: &TypegenArgs) -> Option<PathBuf> {
    args.config
        .clone()
        .or_else(|| Some(args.root.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()))
}

/// Everything a batch run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Root folder of the run
    pub root: PathBuf,
    /// Schema directory, relative to `root`
    pub schemas: PathBuf,
    /// Output directory, relative to `root`
    pub output: PathBuf,
    pub language: TargetLanguage,
    /// Schemas whose path below the schema directory contains any of these
    /// substrings are not generated. Directories above it are not matched.
    pub exclude: Vec<String>,
    pub renderer: RendererOptions,
}

impl BatchConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            schemas: PathBuf::from("schemas"),
            output: PathBuf::from("result"),
            language: TargetLanguage::TypeScript,
            exclude: vec!["ignore".to_string()],
            renderer: RendererOptions::default(),
        }
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join(&self.schemas)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output)
    }

    /// Layer the defaults, then `file`, then command line flags.
    ///
    /// Flags replace the raw file values before anything is parsed, so a
    /// `--language` flag wins over a bad `language` in the file. A program
    /// path with a directory part in the file is taken relative to the root.
    /// Returns the validated config and the quicktype program to run.
    pub fn resolve(
        args: &TypegenArgs,
        file: Option<ConfigFile>,
    ) -> Result<(Self, PathBuf), ConfigError> {
        let mut layered = file.unwrap_or_default();
        layered.quicktype = layered
            .quicktype
            .map(|program| root_relative(&args.root, program));

        if let Some(schemas) = &args.schemas {
            layered.schemas = Some(schemas.clone());
        }
        if let Some(output) = &args.output {
            layered.output = Some(output.clone());
        }
        if let Some(language) = &args.language {
            layered.language = Some(language.clone());
        }
        if !args.exclude.is_empty() {
            layered.exclude = args.exclude.clone();
        }
        if let Some(program) = &args.quicktype {
            layered.quicktype = Some(program.clone());
        }

        let mut config = BatchConfig::new(&args.root);
        layered.apply(&mut config)?;
        config.validate()?;

        let program = layered
            .quicktype
            .unwrap_or_else(|| PathBuf::from(DEFAULT_QUICKTYPE));
        Ok((config, program))
    }

    /// Reject configurations that would scan or write somewhere unexpected
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::invalid("root", "must not be empty"));
        }
        check_subdir("schemas", &self.schemas)?;
        check_subdir("output", &self.output)?;
        // Output inside the schema tree would be scanned back in on the next run
        let (schemas, output) = (self.schemas_dir(), self.output_dir());
        if output.starts_with(&schemas) || schemas.starts_with(&output) {
            return Err(ConfigError::invalid(
                "output",
                format!(
                    "{} and {} must not contain one another",
                    self.output.display(),
                    self.schemas.display()
                ),
            ));
        }
        if self.exclude.iter().any(String::is_empty) {
            return Err(ConfigError::invalid(
                "exclude",
                "an empty marker would exclude every schema",
            ));
        }
        Ok(())
    }
}

/// `tool` stays a `PATH` lookup, `bin/tool` becomes `<root>/bin/tool`
fn root_relative(root: &Path, program: PathBuf) -> PathBuf {
    if program.is_relative() && program.components().count() > 1 {
        root.join(program)
    } else {
        program
    }
}

fn check_subdir(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::invalid(field, "must not be empty"));
    }
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
    {
        return Err(ConfigError::invalid(
            field,
            format!("{} must be a path inside the root", path.display()),
        ));
    }
    Ok(())
}

/// Settings read from a config file; unset fields leave the config untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub schemas: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub language: Option<String>,
    pub exclude: Vec<String>,
    /// Path to the quicktype executable
    pub quicktype: Option<PathBuf>,
    pub renderer: Vec<(RendererOption, bool)>,
}

impl ConfigFile {
    /// Read and parse a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            message: "could not read file".to_string(),
            path: path.to_path_buf(),
            source: Some(Box::new(e)),
        })?;
        Self::from_kdl(&text).map_err(|e| match e {
            ConfigError::File { message, source, .. } => ConfigError::File {
                message,
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_kdl(text: &str) -> Result<Self, ConfigError> {
        let doc = text
            .parse::<kdl::KdlDocument>()
            .map_err(|e| ConfigError::File {
                message: format!("failed to parse KDL: {e}"),
                path: PathBuf::new(),
                source: None,
            })?;

        let mut config = ConfigFile::default();

        for node in doc.nodes() {
            match node.name().value() {
                "schemas" => config.schemas = Some(PathBuf::from(string_arg(node)?)),
                "output" => config.output = Some(PathBuf::from(string_arg(node)?)),
                "language" => config.language = Some(string_arg(node)?.to_string()),
                "exclude" => config.exclude.push(string_arg(node)?.to_string()),
                "quicktype" => config.quicktype = Some(PathBuf::from(string_arg(node)?)),
                "renderer" => config.renderer = parse_renderer(node)?,
                other => {
                    return Err(ConfigError::file(
                        format!("unknown config node: {other}"),
                        PathBuf::new(),
                    ));
                }
            }
        }

        Ok(config)
    }

    /// Overlay these settings onto `config`
    pub fn apply(&self, config: &mut BatchConfig) -> Result<(), ConfigError> {
        if let Some(schemas) = &self.schemas {
            config.schemas = schemas.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(language) = &self.language {
            config.language = language.parse()?;
        }
        if !self.exclude.is_empty() {
            config.exclude = self.exclude.clone();
        }
        for (option, value) in &self.renderer {
            config.renderer.set(*option, *value);
        }
        Ok(())
    }
}

fn string_arg(node: &kdl::KdlNode) -> Result<&str, ConfigError> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| {
            ConfigError::file(
                format!("{} expects a string value", node.name().value()),
                PathBuf::new(),
            )
        })
}

fn parse_renderer(node: &kdl::KdlNode) -> Result<Vec<(RendererOption, bool)>, ConfigError> {
    let Some(children) = node.children() else {
        return Ok(Vec::new());
    };

    let mut options = Vec::new();
    for child in children.nodes() {
        let name = child.name().value();
        let option = RendererOption::from_name(name).ok_or_else(|| {
            ConfigError::file(format!("unknown renderer option: {name}"), PathBuf::new())
        })?;
        let value = child
            .entries()
            .first()
            .and_then(|e| e.value().as_bool())
            .ok_or_else(|| {
                ConfigError::file(format!("{name} expects #true or #false"), PathBuf::new())
            })?;
        options.push((option, value));
    }
    Ok(options)
}
