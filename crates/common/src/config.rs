//! Forecaster configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level forecaster configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecasterConfig {
    /// Where persisted models and scalers live.
    #[serde(default)]
    pub artifacts: ArtifactConfig,

    /// Rollout parameters.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Historical observations source.
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Persisted artifact locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Root directory holding the model and scaler subdirectories.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    #[serde(default = "default_models_subdir")]
    pub models_subdir: String,

    #[serde(default = "default_scalers_subdir")]
    pub scalers_subdir: String,
}

impl ArtifactConfig {
    pub fn models_dir(&self) -> PathBuf {
        self.root_dir.join(&self.models_subdir)
    }

    pub fn scalers_dir(&self) -> PathBuf {
        self.root_dir.join(&self.scalers_subdir)
    }
}

/// Rollout and hardening limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of trailing observations fed to the model per step.
    #[serde(default = "default_window_length")]
    pub window_length: usize,

    /// Largest horizon (days) a single request may ask for.
    #[serde(default = "default_max_horizon")]
    pub max_horizon: usize,

    /// Horizon used when the caller does not specify one.
    #[serde(default = "default_horizon")]
    pub default_horizon: usize,

    /// Per-step inference budget in milliseconds.
    #[serde(default = "default_inference_timeout_ms")]
    pub inference_timeout_ms: u64,
}

/// CSV history source layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    #[serde(default = "default_location_column")]
    pub location_column: String,

    #[serde(default = "default_key_column")]
    pub key_column: String,

    #[serde(default = "default_value_column")]
    pub value_column: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_root_dir() -> PathBuf {
    PathBuf::from("saved_models")
}
fn default_models_subdir() -> String {
    "models".into()
}
fn default_scalers_subdir() -> String {
    "scalers".into()
}

fn default_window_length() -> usize {
    30
}
fn default_max_horizon() -> usize {
    365
}
fn default_horizon() -> usize {
    100
}
fn default_inference_timeout_ms() -> u64 {
    2000
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("historical_data.csv")
}
fn default_location_column() -> String {
    "district_id".into()
}
fn default_key_column() -> String {
    "commodity_id".into()
}
fn default_value_column() -> String {
    "modal_price".into()
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            models_subdir: default_models_subdir(),
            scalers_subdir: default_scalers_subdir(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_length: default_window_length(),
            max_horizon: default_max_horizon(),
            default_horizon: default_horizon(),
            inference_timeout_ms: default_inference_timeout_ms(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            location_column: default_location_column(),
            key_column: default_key_column(),
            value_column: default_value_column(),
        }
    }
}
