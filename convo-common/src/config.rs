//! Configuration loading
//!
//! Every process reads the same optional TOML file, then applies its own
//! command-line / environment overrides on top. Priority is
//! CLI > environment > TOML file > built-in default. The oracle API key is
//! never compiled in; it must arrive through one of those tiers.

use crate::artifact::WritePolicy;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the config file looked up in the working directory and in the
/// user config directory (`<config dir>/convo/convo.toml`).
pub const CONFIG_FILE_NAME: &str = "convo.toml";

/// Environment variable holding the oracle API key.
pub const API_KEY_ENV: &str = "CONVO_API_KEY";

/// Full TOML configuration shared by all processes.
///
/// Every field has a built-in default, so an absent file or empty table is
/// valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stream: StreamSection,
    pub producer: ProducerSection,
    pub sentiment: SentimentSection,
    pub summary: SummarySection,
    pub suggest: SuggestSection,
    pub oracle: OracleSection,
}

/// The shared stream file written by the producer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamSection {
    pub file: PathBuf,
}

impl Default for StreamSection {
    fn default() -> Self {
        Self {
            file: PathBuf::from("output.txt"),
        }
    }
}

/// Transcript replay settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProducerSection {
    /// Source transcript with optional `HH:MM:SS` line prefixes.
    pub input: PathBuf,
    /// Multiplier applied to transcript deltas; below 1.0 speeds replay up.
    pub scale_factor: f64,
}

impl Default for ProducerSection {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input.txt"),
            scale_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentSection {
    pub interval_secs: u64,
    pub artifact: PathBuf,
}

impl Default for SentimentSection {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            artifact: PathBuf::from("sentiment.txt"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarySection {
    pub interval_secs: u64,
    /// Seconds of stream inactivity before the document counts as settled.
    pub dead_time_secs: u64,
    pub artifact: PathBuf,
    /// Requested summary length bounds, in words.
    pub min_length: u32,
    pub max_length: u32,
    /// Upper bound on one summarization cycle.
    pub step_budget_secs: u64,
}

impl Default for SummarySection {
    fn default() -> Self {
        Self {
            interval_secs: 1,
            dead_time_secs: 3,
            artifact: PathBuf::from("summary.txt"),
            min_length: 30,
            max_length: 130,
            step_budget_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestSection {
    pub interval_secs: u64,
    pub artifact: PathBuf,
    /// Static client profile, loaded once at startup.
    pub profile: PathBuf,
    /// Static product catalog, loaded once at startup.
    pub catalog: PathBuf,
    /// `always` preserves the historical rewrite-on-every-result behavior;
    /// `on-change` suppresses identical rewrites like the other consumers.
    pub rewrite: WritePolicy,
    /// Upper bound on one suggestion cycle.
    pub step_budget_secs: u64,
}

impl Default for SuggestSection {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            artifact: PathBuf::from("product_suggestions.txt"),
            profile: PathBuf::from("user_data.txt"),
            catalog: PathBuf::from("product_data.txt"),
            rewrite: WritePolicy::Always,
            step_budget_secs: 60,
        }
    }
}

/// External reasoning service (chat-completions style API).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleSection {
    pub base_url: String,
    pub model: String,
    /// Prefer the CONVO_API_KEY environment variable over this field.
    pub api_key: Option<String>,
}

impl Default for OracleSection {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

impl Settings {
    /// Load settings from `explicit` if given, otherwise from the first
    /// config file found in the default locations, otherwise defaults.
    ///
    /// An explicitly named file must exist and parse; a missing default
    /// location is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Settings> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                Some(p.to_path_buf())
            }
            None => default_config_path(),
        };

        match path {
            Some(path) => {
                let settings = Self::from_file(&path)?;
                info!("Loaded configuration from {}", path.display());
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Settings> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }
}

/// First existing config file among the default locations.
fn default_config_path() -> Option<PathBuf> {
    let cwd = PathBuf::from(CONFIG_FILE_NAME);
    if cwd.exists() {
        return Some(cwd);
    }
    let user = dirs::config_dir().map(|d| d.join("convo").join(CONFIG_FILE_NAME))?;
    user.exists().then_some(user)
}

/// Resolve the oracle API key with CLI/environment > TOML priority.
///
/// `override_key` is the value clap resolved from `--api-key` or the
/// CONVO_API_KEY environment variable.
pub fn resolve_api_key(override_key: Option<String>, oracle: &OracleSection) -> Result<String> {
    if let Some(key) = override_key {
        if !key.trim().is_empty() {
            info!("Oracle API key loaded from CLI/environment");
            return Ok(key);
        }
    }

    if let Some(key) = &oracle.api_key {
        if !key.trim().is_empty() {
            info!("Oracle API key loaded from TOML config");
            return Ok(key.clone());
        }
    }

    Err(Error::Config(format!(
        "oracle API key not configured. Set the {} environment variable, pass --api-key, \
         or add api_key to the [oracle] section of {}",
        API_KEY_ENV, CONFIG_FILE_NAME
    )))
}
