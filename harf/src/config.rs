use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{HarfError, Result};

fn parse_env_or<T: FromStr>(var: &str, default: T) -> T
where
    T::Err: fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub morphology: MorphologyConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// `<provider>/<model>`, e.g. `gemini/gemini-2.0-flash-exp`.
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// Which correction engine backs the primary correction stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphologyBackendKind {
    Local,
    Api,
    None,
}

impl FromStr for MorphologyBackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "lexicon" => Ok(Self::Local),
            "api" | "remote" => Ok(Self::Api),
            "none" | "disabled" | "off" => Ok(Self::None),
            other => Err(format!("unknown morphology backend '{other}'")),
        }
    }
}

impl fmt::Display for MorphologyBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Api => write!(f, "api"),
            Self::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MorphologyConfig {
    pub backend: MorphologyBackendKind,
    /// Lexicon archive for the local engine (a Zemberek jar or a plain word list).
    pub archive_path: PathBuf,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub spell_checker_enabled: bool,
    pub max_suggestions: usize,
    pub cache_size: usize,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            backend: MorphologyBackendKind::Local,
            archive_path: PathBuf::from("zemberek-full.jar"),
            base_url: None,
            timeout_secs: 10,
            spell_checker_enabled: true,
            max_suggestions: 5,
            cache_size: 4096,
        }
    }
}

impl MorphologyConfig {
    /// Checks the startup-fatal conditions for the selected backend.
    pub fn validate(&self) -> Result<()> {
        match self.backend {
            MorphologyBackendKind::Local if !self.archive_path.is_file() => {
                Err(HarfError::Config(format!(
                    "Missing Zemberek lexicon archive: {}",
                    self.archive_path.display()
                )))
            }
            MorphologyBackendKind::Api if self.base_url.is_none() => Err(HarfError::Config(
                "MORPHOLOGY_BASE_URL must be set when MORPHOLOGY_BACKEND=api".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let morphology_defaults = MorphologyConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("HARF_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("HARF_PORT", 5000),
                max_body_bytes: parse_env_or("HARF_MAX_BODY_BYTES", 25 * 1024 * 1024),
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL")
                    .unwrap_or_else(|_| "gemini/gemini-2.0-flash-exp".to_string()),
                api_key: non_empty_env("GENAI_API_KEY").or_else(|| non_empty_env("OCR_API_KEY")),
                base_url: non_empty_env("OCR_BASE_URL"),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60),
                max_retries: parse_env_or("OCR_MAX_RETRIES", 3),
            },
            morphology: MorphologyConfig {
                backend: parse_env_or("MORPHOLOGY_BACKEND", morphology_defaults.backend),
                archive_path: non_empty_env("ZEMBEREK_JAR")
                    .map(PathBuf::from)
                    .unwrap_or(morphology_defaults.archive_path),
                base_url: non_empty_env("MORPHOLOGY_BASE_URL"),
                timeout_secs: parse_env_or("MORPHOLOGY_TIMEOUT", morphology_defaults.timeout_secs),
                spell_checker_enabled: parse_env_or(
                    "SPELL_CHECKER_ENABLED",
                    morphology_defaults.spell_checker_enabled,
                ),
                max_suggestions: parse_env_or(
                    "SPELL_MAX_SUGGESTIONS",
                    morphology_defaults.max_suggestions,
                ),
                cache_size: parse_env_or("SPELL_CACHE_SIZE", morphology_defaults.cache_size),
            },
        }
    }
}

impl Config {
    /// Loads the configuration and fails on anything that must stop the
    /// server from starting.
    pub fn from_env() -> Result<Self> {
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ocr.api_key.is_none() {
            return Err(HarfError::Config(
                "GENAI_API_KEY not set in environment".to_string(),
            ));
        }
        self.morphology.validate()
    }
}

/// Parse an OCR model name into (provider, model) tuple.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    match model.split_once('/') {
        Some((prefix, rest)) => (prefix, rest),
        // Bare model names are Gemini models
        None => ("gemini", model),
    }
}
