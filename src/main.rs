//! Price forecaster: multi-day commodity price forecasts from persisted models.
//!
//! Single-binary CLI that:
//! 1. Resolves district and crop names to artifact ids
//! 2. Reads the price history for the pair from CSV
//! 3. Lazily loads the district's models and scalers
//! 4. Rolls the model forward and prints the dated forecast as JSON

mod catalog;
mod config;
mod history;
mod response;

use std::path::PathBuf;
use std::sync::Arc;

use artifact_store::FsArtifactStore;
use clap::{Parser, Subcommand};
use common::config::ForecasterConfig;
use common::Error;
use forecast_engine::{ForecastEngine, ModelCache};
use serde::Serialize;
use tracing::{error, info};

use crate::history::CsvHistorySource;
use crate::response::{ErrorResponse, ForecastResponse, ModelsResponse};

/// Commodity price forecaster
#[derive(Parser)]
#[command(name = "price-forecaster", about = "Commodity price forecasts from persisted models")]
struct Cli {
    /// Config file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Forecast daily prices for a district and crop.
    Predict {
        #[arg(long)]
        region: String,
        #[arg(long)]
        crop: String,
        /// Days ahead (defaults to engine.default_horizon).
        #[arg(long)]
        days: Option<usize>,
    },
    /// List crops with usable models for a district.
    Models {
        #[arg(long)]
        region: String,
    },
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(body) => println!("{}", body),
        Err(e) => error!("Failed to serialize response: {}", e),
    }
}

fn build_engine(cfg: &ForecasterConfig) -> Result<Arc<ForecastEngine>, Error> {
    let store = FsArtifactStore::from_config(&cfg.artifacts);
    let cache = Arc::new(ModelCache::new(Arc::new(store)));
    Ok(Arc::new(ForecastEngine::new(cache, &cfg.engine)?))
}

async fn predict(
    cfg: &ForecasterConfig,
    engine: &Arc<ForecastEngine>,
    region: &str,
    crop: &str,
    days: Option<usize>,
) -> Result<ForecastResponse, Error> {
    let location = catalog::location_for(region)?;
    let key = catalog::series_for(crop)?;
    let horizon = days.unwrap_or(cfg.engine.default_horizon);

    let source = CsvHistorySource::new(cfg.history.clone());
    let series = {
        let (location, key) = (location.clone(), key.clone());
        tokio::task::spawn_blocking(move || source.series(&location, &key))
            .await
            .map_err(|e| Error::History(format!("history task failed: {e}")))??
    };

    let points = engine
        .forecast_with_timeout(location, key, series, horizon)
        .await?;
    info!("Forecast for {}/{}: {} point(s)", region, crop, points.len());
    Ok(ForecastResponse::new(region, crop, &points))
}

async fn list_models(engine: &Arc<ForecastEngine>, region: &str) -> Result<ModelsResponse, Error> {
    let location = catalog::location_for(region)?;
    let keys = {
        let engine = Arc::clone(engine);
        tokio::task::spawn_blocking(move || engine.available_keys(&location))
            .await
            .map_err(|e| Error::Inference(format!("model listing task failed: {e}")))??
    };
    let mut crops: Vec<String> = keys
        .into_iter()
        .map(|key| {
            catalog::commodity_name(&key)
                .map(str::to_string)
                .unwrap_or_else(|| key.to_string())
        })
        .collect();
    crops.sort();
    Ok(ModelsResponse {
        region: region.to_string(),
        crops,
    })
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the JSON response.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "price_forecaster=info,forecast_engine=info,artifact_store=info".into()
            }),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Artifacts: {} (window={}, max_horizon={}, step_timeout={}ms)",
        cfg.artifacts.root_dir.display(),
        cfg.engine.window_length,
        cfg.engine.max_horizon,
        cfg.engine.inference_timeout_ms,
    );

    let result = match build_engine(&cfg) {
        Ok(engine) => match &cli.command {
            Command::Predict { region, crop, days } => predict(&cfg, &engine, region, crop, *days)
                .await
                .map(|r| print_json(&r)),
            Command::Models { region } => list_models(&engine, region)
                .await
                .map(|r| print_json(&r)),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Request failed: {}", e);
        print_json(&ErrorResponse::from(&e));
        std::process::exit(1);
    }
}
