//! Configuration loader — merges env vars, .env file, and config.toml.

use std::path::{Path, PathBuf};

use common::config::ForecasterConfig;
use common::Error;

fn parse_positive_usize(raw: &str, env_name: &str) -> Result<usize, Error> {
    let parsed = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn validate_config(config: &ForecasterConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.artifacts.models_subdir.trim().is_empty() {
        issues.push("artifacts.models_subdir must not be empty".into());
    }
    if config.artifacts.scalers_subdir.trim().is_empty() {
        issues.push("artifacts.scalers_subdir must not be empty".into());
    }

    if config.engine.window_length == 0 {
        issues.push("engine.window_length must be > 0".into());
    }
    if config.engine.max_horizon == 0 {
        issues.push("engine.max_horizon must be > 0".into());
    }
    if config.engine.default_horizon == 0 {
        issues.push("engine.default_horizon must be > 0".into());
    }
    if config.engine.default_horizon > config.engine.max_horizon {
        issues.push("engine.default_horizon must be <= engine.max_horizon".into());
    }
    if config.engine.inference_timeout_ms == 0 {
        issues.push("engine.inference_timeout_ms must be > 0".into());
    }

    for (field, value) in [
        ("history.location_column", &config.history.location_column),
        ("history.key_column", &config.history.key_column),
        ("history.value_column", &config.history.value_column),
    ] {
        if value.trim().is_empty() {
            issues.push(format!("{field} must not be empty"));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

fn read_config_file(path: &Path) -> Result<ForecasterConfig, Error> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

fn apply_env_overrides(config: &mut ForecasterConfig) -> Result<(), Error> {
    if let Ok(dir) = std::env::var("FORECASTER_ARTIFACTS_DIR") {
        config.artifacts.root_dir = PathBuf::from(dir.trim());
    }
    if let Ok(path) = std::env::var("FORECASTER_HISTORY_CSV") {
        config.history.csv_path = PathBuf::from(path.trim());
    }
    if let Ok(raw) = std::env::var("FORECASTER_WINDOW_LENGTH") {
        config.engine.window_length = parse_positive_usize(&raw, "FORECASTER_WINDOW_LENGTH")?;
    }
    if let Ok(raw) = std::env::var("FORECASTER_MAX_HORIZON") {
        config.engine.max_horizon = parse_positive_usize(&raw, "FORECASTER_MAX_HORIZON")?;
    }
    if let Ok(raw) = std::env::var("FORECASTER_DEFAULT_HORIZON") {
        config.engine.default_horizon =
            parse_positive_usize(&raw, "FORECASTER_DEFAULT_HORIZON")?;
    }
    if let Ok(raw) = std::env::var("FORECASTER_INFERENCE_TIMEOUT_MS") {
        config.engine.inference_timeout_ms =
            parse_positive_u64(&raw, "FORECASTER_INFERENCE_TIMEOUT_MS")?;
    }
    Ok(())
}

/// Load forecaster configuration from environment and optional config file.
///
/// An explicit `path` must exist; otherwise `config.toml` is used when present.
pub fn load_config(path: Option<&Path>) -> Result<ForecasterConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Config file over defaults.
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = Path::new("config.toml");
            if default_path.exists() {
                read_config_file(default_path)?
            } else {
                ForecasterConfig::default()
            }
        }
    };

    // 3. Environment variables (highest priority).
    apply_env_overrides(&mut config)?;

    validate_config(&config)?;

    Ok(config)
}
