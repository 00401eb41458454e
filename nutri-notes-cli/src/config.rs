use clap::ValueEnum;
use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Service that breaks meals down into nutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerProvider {
    #[default]
    Claude,
    Grok,
}

impl std::fmt::Display for AnalyzerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyzerProvider::Claude => write!(f, "claude"),
            AnalyzerProvider::Grok => write!(f, "grok"),
        }
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerConfig {
    pub provider: ConfigValue<AnalyzerProvider>,
    /// Anthropic API key, used by the claude provider
    #[serde(serialize_with = "mask_secret")]
    pub anthropic_api_key: Option<String>,
    /// xAI API key, used by the grok provider
    #[serde(serialize_with = "mask_secret")]
    pub xai_api_key: Option<String>,
    /// Model override; each provider has its own default
    pub model: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            provider: ConfigValue::new(AnalyzerProvider::default(), ConfigSource::Default),
            anthropic_api_key: None,
            xai_api_key: None,
            model: None,
        }
    }
}

fn mask_secret<S: Serializer>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_some("********"),
        None => serializer.serialize_none(),
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root directory of the daily notes
    pub notes_dir: ConfigValue<PathBuf>,
    /// Subdirectory (next to each notes file) holding the breakdown documents
    pub nutrition_dir: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub analyzer: AnalyzerConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    notes_dir: Option<PathBuf>,
    nutrition_dir: Option<String>,
    analyzer: Option<AnalyzerFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct AnalyzerFile {
    provider: Option<AnalyzerProvider>,
    anthropic_api_key: Option<String>,
    xai_api_key: Option<String>,
    model: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading environment variables through `env`.
    pub fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut notes_dir = ConfigValue::new(Self::default_notes_dir(), ConfigSource::Default);
        let mut nutrition_dir =
            ConfigValue::new(DEFAULT_NUTRITION_DIR.to_string(), ConfigSource::Default);
        let mut config_file = None;
        let mut analyzer = AnalyzerConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.notes_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                notes_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(dir) = file_config.nutrition_dir {
                nutrition_dir = ConfigValue::new(dir, ConfigSource::File);
            }
            if let Some(file_analyzer) = file_config.analyzer {
                if let Some(provider) = file_analyzer.provider {
                    analyzer.provider = ConfigValue::new(provider, ConfigSource::File);
                }
                analyzer.anthropic_api_key = file_analyzer.anthropic_api_key;
                analyzer.xai_api_key = file_analyzer.xai_api_key;
                analyzer.model = file_analyzer.model;
            }
        }

        // Apply environment variable overrides
        if let Some(dir) = env("NUTRI_NOTES_DIR") {
            notes_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Some(dir) = env("NUTRI_NUTRITION_DIR") {
            nutrition_dir = ConfigValue::new(dir, ConfigSource::Environment);
        }
        if let Some(name) = env("NUTRI_ANALYZER") {
            let provider = AnalyzerProvider::from_str(&name, true).map_err(|_| {
                ConfigError::InvalidValue("NUTRI_ANALYZER".to_string(), name.clone())
            })?;
            analyzer.provider = ConfigValue::new(provider, ConfigSource::Environment);
        }
        if let Some(model) = env("NUTRI_MODEL") {
            analyzer.model = Some(model);
        }
        if let Some(key) = env("ANTHROPIC_API_KEY") {
            analyzer.anthropic_api_key = Some(key);
        }
        if let Some(key) = env("XAI_API_KEY") {
            analyzer.xai_api_key = Some(key);
        }

        Ok(Self {
            notes_dir,
            nutrition_dir,
            config_file,
            analyzer,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/nutri/
    /// - macOS: ~/Library/Application Support/nutri/
    /// - Windows: %APPDATA%/nutri/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutri")
    }

    /// Default notes directory: `daily` in the user's documents directory.
    pub fn default_notes_dir() -> PathBuf {
        dirs::document_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("daily")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

pub const DEFAULT_NUTRITION_DIR: &str = "n101";

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value '{}' for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
