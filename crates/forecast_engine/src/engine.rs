//! Forecast orchestration.
//!
//! Resolves the (model, scaler) pair for a request, builds the input window,
//! and rolls the model forward one step at a time, feeding each prediction
//! back into the window. Scaled predictions are inverse-transformed in one
//! batch at the end.

use std::sync::Arc;
use std::time::Duration;

use artifact_store::Predictor;
use chrono::{Days, Local, NaiveDate};
use common::config::EngineConfig;
use common::{Error, LocationId, PredictionPoint, Result, SeriesKey};
use tracing::{debug, info};

use crate::cache::{ModelCache, ModelPair};
use crate::window::{SequenceBuilder, Window};

pub struct ForecastEngine {
    cache: Arc<ModelCache>,
    builder: SequenceBuilder,
    max_horizon: usize,
    inference_timeout: Duration,
}

impl ForecastEngine {
    pub fn new(cache: Arc<ModelCache>, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            cache,
            builder: SequenceBuilder::new(config.window_length)?,
            max_horizon: config.max_horizon,
            inference_timeout: Duration::from_millis(config.inference_timeout_ms),
        })
    }

    /// Series keys with a usable model at `location`, sorted.
    pub fn available_keys(&self, location: &LocationId) -> Result<Vec<SeriesKey>> {
        let models = self.cache.get_or_load(location)?;
        let mut keys: Vec<SeriesKey> = models.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Forecast `horizon` days ahead of today.
    pub fn forecast(
        &self,
        location: &LocationId,
        key: &SeriesKey,
        series: &[f64],
        horizon: usize,
    ) -> Result<Vec<PredictionPoint>> {
        self.forecast_at(Local::now().date_naive(), location, key, series, horizon)
    }

    /// Forecast `horizon` days ahead of `issue_date`.
    ///
    /// The first point is dated `issue_date + 1`.
    pub fn forecast_at(
        &self,
        issue_date: NaiveDate,
        location: &LocationId,
        key: &SeriesKey,
        series: &[f64],
        horizon: usize,
    ) -> Result<Vec<PredictionPoint>> {
        self.check_horizon(horizon)?;
        info!(
            "Forecasting location {} series {} for {} day(s) from {} observations (window={})",
            location,
            key,
            horizon,
            series.len(),
            self.builder.window_length()
        );

        let (pair, window) = self.prepare(location, key, series)?;
        let scaled = rollout(pair.model.as_ref(), window, horizon)?;
        self.finish(issue_date, &pair, &scaled, horizon)
    }

    /// Same as `forecast`, but only the rollout runs under a deadline of
    /// `inference_timeout × horizon`.
    ///
    /// Artifact loading and window construction happen first on the blocking
    /// pool with no deadline, so a cold cache does not eat into the budget.
    pub async fn forecast_with_timeout(
        self: &Arc<Self>,
        location: LocationId,
        key: SeriesKey,
        series: Vec<f64>,
        horizon: usize,
    ) -> Result<Vec<PredictionPoint>> {
        self.check_horizon(horizon)?;
        let issue_date = Local::now().date_naive();
        info!(
            "Forecasting location {} series {} for {} day(s) from {} observations (window={})",
            location,
            key,
            horizon,
            series.len(),
            self.builder.window_length()
        );

        let engine = Arc::clone(self);
        let (pair, window) =
            tokio::task::spawn_blocking(move || engine.prepare(&location, &key, &series))
                .await
                .map_err(|e| Error::Inference(format!("forecast task failed: {e}")))??;

        let steps = u32::try_from(horizon).unwrap_or(u32::MAX);
        let budget = self.inference_timeout.saturating_mul(steps);
        let model = Arc::clone(&pair.model);
        let task = tokio::task::spawn_blocking(move || rollout(model.as_ref(), window, horizon));

        let scaled = match tokio::time::timeout(budget, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(e)) => return Err(Error::Inference(format!("forecast task failed: {e}"))),
            Err(_) => {
                return Err(Error::InferenceTimeout {
                    timeout_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                })
            }
        };
        self.finish(issue_date, &pair, &scaled, horizon)
    }

    /// Resolve the pair for `key` at `location` and build its input window.
    fn prepare(
        &self,
        location: &LocationId,
        key: &SeriesKey,
        series: &[f64],
    ) -> Result<(ModelPair, Window)> {
        let models = self.cache.get_or_load(location)?;
        if models.is_empty() {
            return Err(Error::NoModelsForLocation(location.clone()));
        }
        let pair = models.get(key).cloned().ok_or_else(|| Error::ModelNotFound {
            location: location.clone(),
            key: key.clone(),
        })?;

        let window = self.builder.build_window(series, pair.scaler.as_ref())?;
        Ok((pair, window))
    }

    /// Inverse-transform the scaled rollout in one batch and date each point.
    fn finish(
        &self,
        issue_date: NaiveDate,
        pair: &ModelPair,
        scaled: &[f64],
        horizon: usize,
    ) -> Result<Vec<PredictionPoint>> {
        let raw = pair.scaler.inverse(scaled);
        if raw.len() != horizon {
            return Err(Error::Inference(format!(
                "scaler returned {} values for {} predictions",
                raw.len(),
                horizon
            )));
        }

        raw.into_iter()
            .enumerate()
            .map(|(i, value)| {
                let date = issue_date
                    .checked_add_days(Days::new(i as u64 + 1))
                    .ok_or_else(|| Error::InvalidHorizon {
                        requested: horizon,
                        max: self.max_horizon,
                    })?;
                Ok(PredictionPoint { date, value })
            })
            .collect()
    }

    fn check_horizon(&self, horizon: usize) -> Result<()> {
        if horizon == 0 || horizon > self.max_horizon {
            return Err(Error::InvalidHorizon {
                requested: horizon,
                max: self.max_horizon,
            });
        }
        Ok(())
    }
}

/// Autoregressive rollout: each prediction displaces the oldest window value.
fn rollout(model: &dyn Predictor, mut window: Window, horizon: usize) -> Result<Vec<f64>> {
    let mut predictions = Vec::with_capacity(horizon);
    for step in 0..horizon {
        let next = model.predict_next(window.as_slice())?;
        debug!("step {}: scaled prediction {:.6}", step + 1, next);
        predictions.push(next);
        window.slide(next);
    }
    Ok(predictions)
}
