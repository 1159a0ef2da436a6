//! Value-scaling transforms.
//!
//! A scaler maps raw values into the domain a model was trained on and
//! back. `inverse(forward(x)) == x` within floating-point tolerance.

use std::sync::Arc;

use common::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::format;

pub trait Scaler: Send + Sync {
    /// Raw values to scaled values.
    fn forward(&self, raw: &[f64]) -> Vec<f64>;

    /// Scaled values back to raw values.
    fn inverse(&self, scaled: &[f64]) -> Vec<f64>;
}

/// Linear rescale of `[data_min, data_max]` onto `feature_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: f64,
    pub data_max: f64,
    #[serde(default = "unit_range")]
    pub feature_range: (f64, f64),
}

fn unit_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl MinMaxScaler {
    pub fn new(data_min: f64, data_max: f64) -> Self {
        Self {
            data_min,
            data_max,
            feature_range: unit_range(),
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let (lo, hi) = self.feature_range;
        if ![self.data_min, self.data_max, lo, hi].iter().all(|v| v.is_finite()) {
            return Err("min_max parameters must be finite".into());
        }
        if self.data_max < self.data_min {
            return Err("data_max must be >= data_min".into());
        }
        if hi <= lo {
            return Err("feature_range upper bound must exceed lower bound".into());
        }
        Ok(())
    }

    fn scale(&self) -> f64 {
        let (lo, hi) = self.feature_range;
        let range = self.data_max - self.data_min;
        // Constant training data: unit data range, as sklearn does.
        if range == 0.0 {
            hi - lo
        } else {
            (hi - lo) / range
        }
    }
}

impl Scaler for MinMaxScaler {
    fn forward(&self, raw: &[f64]) -> Vec<f64> {
        let scale = self.scale();
        let lo = self.feature_range.0;
        raw.iter().map(|x| (x - self.data_min) * scale + lo).collect()
    }

    fn inverse(&self, scaled: &[f64]) -> Vec<f64> {
        let scale = self.scale();
        let lo = self.feature_range.0;
        scaled.iter().map(|x| (x - lo) / scale + self.data_min).collect()
    }
}

/// Standardization to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: f64,
    pub scale: f64,
}

impl StandardScaler {
    fn validate(&self) -> std::result::Result<(), String> {
        if !self.mean.is_finite() || !self.scale.is_finite() {
            return Err("standard parameters must be finite".into());
        }
        if self.scale < 0.0 {
            return Err("scale must be >= 0".into());
        }
        Ok(())
    }

    fn effective_scale(&self) -> f64 {
        if self.scale == 0.0 {
            1.0
        } else {
            self.scale
        }
    }
}

impl Scaler for StandardScaler {
    fn forward(&self, raw: &[f64]) -> Vec<f64> {
        let scale = self.effective_scale();
        raw.iter().map(|x| (x - self.mean) / scale).collect()
    }

    fn inverse(&self, scaled: &[f64]) -> Vec<f64> {
        let scale = self.effective_scale();
        scaled.iter().map(|x| x * scale + self.mean).collect()
    }
}

/// Persisted scaler formats, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerArtifact {
    MinMax(MinMaxScaler),
    Standard(StandardScaler),
}

/// Parse a persisted scaler.
pub fn load_scaler(name: &str, bytes: &[u8]) -> Result<Arc<dyn Scaler>> {
    let artifact: ScalerArtifact = format::decode(name, bytes)?;
    let scaler: Arc<dyn Scaler> = match artifact {
        ScalerArtifact::MinMax(s) => {
            s.validate().map_err(|e| Error::artifact_load(name, e))?;
            Arc::new(s)
        }
        ScalerArtifact::Standard(s) => {
            s.validate().map_err(|e| Error::artifact_load(name, e))?;
            Arc::new(s)
        }
    };
    Ok(scaler)
}
