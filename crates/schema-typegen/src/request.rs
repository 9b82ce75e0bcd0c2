//! Generation requests and the fixed options they carry

use crate::corpus::{SchemaCorpus, SchemaFile};
use crate::error::{ConfigError, Result, TypegenError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output language of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    TypeScript,
    Swift,
}

impl TargetLanguage {
    /// Selectors accepted by [`FromStr`]
    pub const SELECTORS: &'static [&'static str] = &["ts", "typescript", "swift"];

    /// Extension of generated files, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => "ts",
            TargetLanguage::Swift => "swift",
        }
    }

    /// Name quicktype knows the language by
    pub fn quicktype_name(&self) -> &'static str {
        match self {
            TargetLanguage::TypeScript => "typescript",
            TargetLanguage::Swift => "swift",
        }
    }

    /// Whether the language's renderer understands `option`
    pub fn accepts(&self, option: RendererOption) -> bool {
        match self {
            TargetLanguage::TypeScript => true,
            TargetLanguage::Swift => matches!(option, RendererOption::JustTypes),
        }
    }
}

impl FromStr for TargetLanguage {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ts" | "typescript" => Ok(TargetLanguage::TypeScript),
            "swift" => Ok(TargetLanguage::Swift),
            _ => Err(ConfigError::unsupported_language(s, Self::SELECTORS)),
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.quicktype_name())
    }
}

/// Named renderer switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererOption {
    JustTypes,
    PreferTypes,
    PreferUnions,
    PreferConstValues,
    GenerateAdditionalPropertyAccess,
}

impl RendererOption {
    pub const ALL: [RendererOption; 5] = [
        RendererOption::JustTypes,
        RendererOption::PreferTypes,
        RendererOption::PreferUnions,
        RendererOption::PreferConstValues,
        RendererOption::GenerateAdditionalPropertyAccess,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RendererOption::JustTypes => "just-types",
            RendererOption::PreferTypes => "prefer-types",
            RendererOption::PreferUnions => "prefer-unions",
            RendererOption::PreferConstValues => "prefer-const-values",
            RendererOption::GenerateAdditionalPropertyAccess => {
                "generate-additional-property-access"
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }
}

/// Renderer configuration shared by every request of a run.
///
/// The default produces type declarations only, with named types preferred
/// over inline unions and literal types used for constant values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererOptions {
    pub just_types: bool,
    pub prefer_types: bool,
    pub prefer_unions: bool,
    pub prefer_const_values: bool,
    pub generate_additional_property_access: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            just_types: true,
            prefer_types: true,
            prefer_unions: false,
            prefer_const_values: true,
            generate_additional_property_access: false,
        }
    }
}

impl RendererOptions {
    pub fn get(&self, option: RendererOption) -> bool {
        match option {
            RendererOption::JustTypes => self.just_types,
            RendererOption::PreferTypes => self.prefer_types,
            RendererOption::PreferUnions => self.prefer_unions,
            RendererOption::PreferConstValues => self.prefer_const_values,
            RendererOption::GenerateAdditionalPropertyAccess => {
                self.generate_additional_property_access
            }
        }
    }

    pub fn set(&mut self, option: RendererOption, value: bool) {
        let slot = match option {
            RendererOption::JustTypes => &mut self.just_types,
            RendererOption::PreferTypes => &mut self.prefer_types,
            RendererOption::PreferUnions => &mut self.prefer_unions,
            RendererOption::PreferConstValues => &mut self.prefer_const_values,
            RendererOption::GenerateAdditionalPropertyAccess => {
                &mut self.generate_additional_property_access
            }
        };
        *slot = value;
    }

    /// Enabled options the language accepts, in declaration order
    pub fn enabled_for(&self, language: TargetLanguage) -> Vec<RendererOption> {
        RendererOption::ALL
            .into_iter()
            .filter(|o| self.get(*o) && language.accepts(*o))
            .collect()
    }
}

/// Everything the engine needs to generate types for one schema
#[derive(Debug, Clone)]
pub struct GenerationRequest<'c> {
    /// Logical name, used as the top-level type name
    pub name: String,
    /// Path of the schema the source was read from
    pub path: &'c Path,
    /// Raw schema text
    pub source: String,
    pub corpus: &'c SchemaCorpus,
    pub language: TargetLanguage,
    pub options: RendererOptions,
}

impl<'c> GenerationRequest<'c> {
    /// Read `file` and bind it to the shared corpus
    pub async fn build(
        file: &'c SchemaFile,
        corpus: &'c SchemaCorpus,
        language: TargetLanguage,
        options: RendererOptions,
    ) -> Result<Self> {
        let source = tokio::fs::read_to_string(&file.path)
            .await
            .map_err(|e| TypegenError::read(e, &file.path))?;

        Ok(Self {
            name: file.name.clone(),
            path: &file.path,
            source,
            corpus,
            language,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_language_selectors() {
        assert_eq!("ts".parse::<TargetLanguage>().unwrap(), TargetLanguage::TypeScript);
        assert_eq!(
            "TypeScript".parse::<TargetLanguage>().unwrap(),
            TargetLanguage::TypeScript
        );
        assert_eq!("swift".parse::<TargetLanguage>().unwrap(), TargetLanguage::Swift);
        assert_eq!(TargetLanguage::Swift.extension(), "swift");
        assert_eq!(TargetLanguage::TypeScript.extension(), "ts");
    }

    #[test]
    fn test_unsupported_language_fails() {
        let err = "kotlin".parse::<TargetLanguage>().unwrap_err();
        match err {
            ConfigError::UnsupportedLanguage {
                selector,
                supported,
            } => {
                assert_eq!(selector, "kotlin");
                assert_eq!(supported, "ts, typescript, swift");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_default_renderer_options() {
        let options = RendererOptions::default();
        let enabled: Vec<_> = options
            .enabled_for(TargetLanguage::TypeScript)
            .iter()
            .map(|o| o.name())
            .collect();
        assert_eq!(enabled, vec!["just-types", "prefer-types", "prefer-const-values"]);

        let swift: Vec<_> = options
            .enabled_for(TargetLanguage::Swift)
            .iter()
            .map(|o| o.name())
            .collect();
        assert_eq!(swift, vec!["just-types"]);
    }

    #[test]
    fn test_option_names_round_trip() {
        let mut options = RendererOptions::default();
        for option in RendererOption::ALL {
            assert_eq!(RendererOption::from_name(option.name()), Some(option));
            options.set(option, false);
            assert!(!options.get(option));
        }
        assert_eq!(RendererOption::from_name("explicit-unions"), None);
    }

    #[tokio::test]
    async fn test_build_reads_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Foo.json");
        std::fs::write(&path, r#"{"type":"object"}"#).unwrap();

        let corpus = SchemaCorpus::from_paths([path.clone()]);
        let file = SchemaFile::new(path.clone());
        let request = GenerationRequest::build(
            &file,
            &corpus,
            TargetLanguage::TypeScript,
            RendererOptions::default(),
        )
        .await
        .expect("build request");

        assert_eq!(request.name, "Foo");
        assert_eq!(request.source, r#"{"type":"object"}"#);
        assert_eq!(request.corpus.len(), 1);
    }

    #[tokio::test]
    async fn test_build_missing_file_is_read_error() {
        let corpus = SchemaCorpus::new();
        let file = SchemaFile::new(PathBuf::from("/definitely/not/here/Foo.json"));
        let err = GenerationRequest::build(
            &file,
            &corpus,
            TargetLanguage::TypeScript,
            RendererOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, TypegenError::Read { .. }));
        assert!(err.is_recoverable());
    }
}
