use rand::Rng;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ProtogenError, Result};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "PROTOGEN_CONFIG";

/// Configuration for the protocol generator.
///
/// Every section has defaults, so a missing or partial `config.toml`
/// still yields a usable config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtogenConfig {
    pub timings: TimingsConfig,
    pub options: OptionsConfig,
    pub export: ExportConfig,
    pub ui: UiConfig,
}

/// Artificial delays, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingsConfig {
    /// Fixed wait between an accepted submit and navigation
    pub submit_delay_ms: u64,
    /// Lower bound (inclusive) of a card's reveal delay
    pub card_delay_min_ms: u64,
    /// Upper bound (exclusive) of a card's reveal delay
    pub card_delay_max_ms: u64,
    /// Upper bound on a single generator call
    pub generation_timeout_ms: u64,
}

impl Default for TimingsConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2500,
            card_delay_min_ms: 1500,
            card_delay_max_ms: 2500,
            generation_timeout_ms: 30_000,
        }
    }
}

impl TimingsConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    /// Draw a card reveal delay uniformly from `[min, max)`.
    ///
    /// A degenerate range (`max <= min`) always yields `min`.
    pub fn card_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let ms = if self.card_delay_max_ms > self.card_delay_min_ms {
            rng.gen_range(self.card_delay_min_ms..self.card_delay_max_ms)
        } else {
            self.card_delay_min_ms
        };
        Duration::from_millis(ms)
    }
}

/// Enumerated option sets offered by the two select fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    pub disease_areas: Vec<String>,
    pub study_types: Vec<String>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            disease_areas: [
                "Oncology",
                "Cardiology",
                "Neurology",
                "Immunology",
                "Infectious Disease",
                "Rare Diseases",
            ]
            .map(String::from)
            .to_vec(),
            study_types: [
                "Phase I Clinical Trial",
                "Phase II Clinical Trial",
                "Phase III Clinical Trial",
                "Observational Study",
                "Real-World Evidence Study",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the report is written to (current directory when unset)
    pub output_dir: Option<PathBuf>,
}

impl ExportConfig {
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Visual theme for the terminal front-end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Classic,
    Neon,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
}

impl ProtogenConfig {
    /// Load config from `$PROTOGEN_CONFIG` or ~/.protogen/config.toml
    ///
    /// A missing file is not an error: defaults are returned.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ProtogenError::toml_parse(path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Config file path: `$PROTOGEN_CONFIG` or ~/.protogen/config.toml
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        Self::home_dir().join("config.toml")
    }

    /// ~/.protogen, falling back to the current directory
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".protogen")
    }

    /// Reject configs the session cannot run with
    pub fn validate(&self) -> Result<()> {
        let timings = &self.timings;
        if timings.card_delay_max_ms < timings.card_delay_min_ms {
            return Err(ProtogenError::config(format!(
                "timings.card_delay_max_ms ({}) is below card_delay_min_ms ({})",
                timings.card_delay_max_ms, timings.card_delay_min_ms
            )));
        }
        if timings.generation_timeout_ms == 0 {
            return Err(ProtogenError::config(
                "timings.generation_timeout_ms must be positive",
            ));
        }

        for (name, values) in [
            ("options.disease_areas", &self.options.disease_areas),
            ("options.study_types", &self.options.study_types),
        ] {
            if values.is_empty() {
                return Err(ProtogenError::config(format!("{name} must not be empty")));
            }
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(ProtogenError::config(format!(
                    "{name} contains a blank entry"
                )));
            }
        }

        Ok(())
    }

    /// Save config to the given path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)
            .map_err(|source| ProtogenError::TomlSerialize { source })?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    /// Save config to `config_path()`
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }
}
