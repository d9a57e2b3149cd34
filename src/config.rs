//! Configuration primitives for the essay generator.
//!
//! Stored in a TOML file located at `<workspace>/config/config.toml`, where the
//! workspace root is `ESSAYBASE_HOME` or the OS data directory. Provider
//! credentials never live in this file; they are read once from the
//! environment and handed to the provider clients explicitly.

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{EssayError, EssayResult};

/// Standard relative path to the config file (resolved per OS at runtime).
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const HOME_ENV: &str = "ESSAYBASE_HOME";
pub const SEARCH_API_KEY_ENV: &str = "SERPLY_API_KEY";
pub const GENERATION_API_KEY_ENV: &str = "TOGETHER_API_KEY";

/// Root configuration persisted per installation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Scholar search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
        }
    }
}

fn default_search_endpoint() -> String {
    "https://api.serply.io/v1/scholar".into()
}

/// Text-generation provider settings and sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            repetition_penalty: default_repetition_penalty(),
            stop: default_stop(),
        }
    }
}

fn default_generation_endpoint() -> String {
    "https://api.together.xyz/inference".into()
}

fn default_model() -> String {
    "mistralai/Mixtral-8x7B-Instruct-v0.1".into()
}

const fn default_max_tokens() -> u32 {
    3048
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_top_p() -> f32 {
    0.7
}

const fn default_top_k() -> u32 {
    50
}

const fn default_repetition_penalty() -> f32 {
    1.0
}

fn default_stop() -> Vec<String> {
    vec!["Título:".into()]
}

/// Fixed labels written into the exported document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_heading")]
    pub heading: String,
    #[serde(default = "default_disclaimer")]
    pub disclaimer: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            disclaimer: default_disclaimer(),
        }
    }
}

fn default_heading() -> String {
    "Academic Essay".into()
}

fn default_disclaimer() -> String {
    "\nNota: Este documento fue generado por un asistente de IA. Verifica la información con fuentes académicas para un análisis más profundo.".into()
}

/// Transport tuning shared by both provider clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds; unset leaves the client default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl HttpSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Provider API keys, loaded once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub search_api_key: String,
    pub generation_api_key: String,
}

impl Credentials {
    pub fn new(search_api_key: impl Into<String>, generation_api_key: impl Into<String>) -> Self {
        Self {
            search_api_key: search_api_key.into(),
            generation_api_key: generation_api_key.into(),
        }
    }

    pub fn from_env() -> EssayResult<Self> {
        Ok(Self {
            search_api_key: required_env(SEARCH_API_KEY_ENV)?,
            generation_api_key: required_env(GENERATION_API_KEY_ENV)?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("search_api_key", &"<redacted>")
            .field("generation_api_key", &"<redacted>")
            .finish()
    }
}

fn required_env(name: &str) -> EssayResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Ok(_) => Err(EssayError::Config(format!("{name} is set but empty"))),
        Err(_) => Err(EssayError::Config(format!("{name} is not set"))),
    }
}

/// Returns the root directory where the essay generator stores data.
///
/// Order of precedence:
/// 1. `ESSAYBASE_HOME` environment variable.
/// 2. OS-specific data directory via `directories::BaseDirs`.
pub fn workspace_root() -> Result<PathBuf> {
    if let Ok(path) = env::var(HOME_ENV) {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = BaseDirs::new().context("Unable to determine OS data directory")?;
    Ok(base_dirs.data_dir().join("EssayBase"))
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(workspace_root()?.join("config"))
}

/// Path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from disk or returns defaults.
pub fn load_or_default() -> Result<AppConfig> {
    let path = config_file_path()?;
    if path.exists() {
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let cfg: AppConfig = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

/// Persists the configuration to disk.
pub fn save(config: &AppConfig) -> Result<()> {
    let dir = config_dir()?;
    fs::create_dir_all(&dir)?;
    let path = config_file_path()?;
    let data = toml::to_string_pretty(config)?;
    fs::write(&path, data).with_context(|| format!("Failed to write config file {:?}", path))?;
    Ok(())
}
