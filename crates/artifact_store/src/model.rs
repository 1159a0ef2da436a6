//! Predictive units.
//!
//! A predictor maps one window of scaled values to the scaled value of the
//! next time step. It never mutates the window it is given.

use std::sync::{Arc, Mutex};

use common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::format;

pub trait Predictor: Send + Sync {
    fn predict_next(&self, window: &[f64]) -> Result<f64>;
}

/// A predictor whose runtime needs exclusive access per call.
pub trait StatefulPredictor: Send {
    fn predict_next(&mut self, window: &[f64]) -> Result<f64>;
}

/// Serializes calls to a `StatefulPredictor` behind a per-adapter mutex.
pub struct SerializedPredictor<P> {
    inner: Mutex<P>,
}

impl<P: StatefulPredictor> SerializedPredictor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }
}

impl<P: StatefulPredictor> Predictor for SerializedPredictor<P> {
    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::Inference("predictor mutex poisoned".into()))?;
        guard.predict_next(window)
    }
}

/// Linear autoregression over the window: `bias + Σ weights[i] * window[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearWindowModel {
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

impl LinearWindowModel {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.weights.is_empty() {
            return Err("linear model has no weights".into());
        }
        if !self.bias.is_finite() || !self.weights.iter().all(|w| w.is_finite()) {
            return Err("linear model parameters must be finite".into());
        }
        Ok(())
    }
}

impl Predictor for LinearWindowModel {
    fn predict_next(&self, window: &[f64]) -> Result<f64> {
        if window.len() != self.weights.len() {
            return Err(Error::Inference(format!(
                "window has {} values, model expects {}",
                window.len(),
                self.weights.len()
            )));
        }
        let next = self.bias
            + self
                .weights
                .iter()
                .zip(window)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        if !next.is_finite() {
            return Err(Error::Inference(format!("non-finite prediction {next}")));
        }
        Ok(next)
    }
}

/// Persisted predictor formats, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum PredictorArtifact {
    Linear(LinearWindowModel),
}

/// Parse a persisted predictor.
pub fn load_predictor(name: &str, bytes: &[u8]) -> Result<Arc<dyn Predictor>> {
    let artifact: PredictorArtifact = format::decode(name, bytes)?;
    match artifact {
        PredictorArtifact::Linear(model) => {
            model.validate().map_err(|e| Error::artifact_load(name, e))?;
            Ok(Arc::new(model))
        }
    }
}
