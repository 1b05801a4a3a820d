//! Runtime configuration.
//!
//! Settings come from `MOODLIFT_*` environment variables plus provider key
//! variables. An optional YAML catalog file can replace the built-in persona
//! and shortcut tables:
//!
//! ```yaml
//! personas:
//!   - name: Grandma
//!     tone: a warm grandmother who always has a story and a snack
//! shortcuts:
//!   hi: Hello dear, come sit down.
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{Persona, PersonaCatalog};
use crate::export::DEFAULT_EXPORT_DIR;
use crate::llms::base_llm::DEFAULT_TIMEOUT_SECS;
use crate::llms::ProviderKind;
use crate::prompt::ResponseFormat;
use crate::shortcut::ShortcutTable;
use crate::utilities::errors::ConfigError;

/// Settings for the outbound generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub provider: ProviderKind,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f64>,
    pub timeout_secs: f64,
    pub max_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        let provider = ProviderKind::default();
        Self {
            provider,
            model: provider.default_model().to_string(),
            api_key: None,
            base_url: None,
            temperature: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 0,
        }
    }
}

/// Everything the engine and CLI need for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub generation: GenerationConfig,
    /// Reply shape requested in advice mode.
    pub response_format: ResponseFormat,
    /// YAML file replacing the built-in persona and shortcut tables.
    pub catalog_path: Option<PathBuf>,
    pub export_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            response_format: ResponseFormat::default(),
            catalog_path: None,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

impl EngineConfig {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider: ProviderKind = parse_var(&var, "MOODLIFT_PROVIDER")?.unwrap_or_default();
        let api_key = match provider {
            ProviderKind::Gemini => var("GOOGLE_API_KEY").or_else(|| var("GEMINI_API_KEY")),
            ProviderKind::OpenAi => var("OPENAI_API_KEY"),
        };

        let generation = GenerationConfig {
            provider,
            model: var("MOODLIFT_MODEL").unwrap_or_else(|| provider.default_model().to_string()),
            api_key,
            base_url: var("MOODLIFT_BASE_URL"),
            temperature: parse_var(&var, "MOODLIFT_TEMPERATURE")?,
            timeout_secs: parse_var(&var, "MOODLIFT_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_retries: parse_var(&var, "MOODLIFT_MAX_RETRIES")?.unwrap_or(0),
        };

        if generation.timeout_secs <= 0.0
            || Duration::try_from_secs_f64(generation.timeout_secs).is_err()
        {
            return Err(ConfigError::InvalidValue {
                name: "MOODLIFT_TIMEOUT_SECS",
                value: generation.timeout_secs.to_string(),
            });
        }

        Ok(Self {
            generation,
            response_format: parse_var(&var, "MOODLIFT_RESPONSE_FORMAT")?.unwrap_or_default(),
            catalog_path: var("MOODLIFT_CATALOG").map(PathBuf::from),
            export_dir: var("MOODLIFT_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR)),
        })
    }

    /// Persona and shortcut tables for this run: the catalog file's when
    /// configured, the built-ins otherwise.
    pub fn load_catalogs(&self) -> Result<(PersonaCatalog, ShortcutTable), ConfigError> {
        match &self.catalog_path {
            Some(path) => CatalogFile::from_yaml_file(path)?.into_tables(path),
            None => Ok((PersonaCatalog::builtin(), ShortcutTable::builtin())),
        }
    }
}

fn parse_var<T, F>(var: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(None),
    }
}

/// On-disk catalog overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personas: Option<Vec<Persona>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<BTreeMap<String, String>>,
}

impl CatalogFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Build the tables. Each section that is present replaces its built-in
    /// table entirely; a missing section keeps the built-in one.
    pub fn into_tables(self, path: &Path) -> Result<(PersonaCatalog, ShortcutTable), ConfigError> {
        let invalid = |message: String| ConfigError::Invalid {
            path: path.display().to_string(),
            message,
        };

        let personas = match self.personas {
            Some(personas) => {
                if personas.is_empty() {
                    return Err(invalid("personas list is empty".to_string()));
                }
                if let Some(blank) = personas.iter().find(|p| p.name.trim().is_empty()) {
                    return Err(invalid(format!("persona with tone {:?} has no name", blank.tone)));
                }
                PersonaCatalog::new(personas).map_err(|err| invalid(err.to_string()))?
            }
            None => PersonaCatalog::builtin(),
        };

        let shortcuts = match self.shortcuts {
            Some(entries) => ShortcutTable::new(entries),
            None => ShortcutTable::builtin(),
        };

        tracing::info!(
            path = %path.display(),
            personas = personas.len(),
            shortcuts = shortcuts.len(),
            "loaded catalog file"
        );
        Ok((personas, shortcuts))
    }
}
