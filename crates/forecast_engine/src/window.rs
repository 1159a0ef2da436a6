//! Input window construction.

use artifact_store::Scaler;
use common::{Error, Result};

/// Fixed-length window of scaled values, most recent last.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: Vec<f64>,
}

impl Window {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Drop the oldest value and append `next`. Length is unchanged.
    pub fn slide(&mut self, next: f64) {
        self.values.rotate_left(1);
        if let Some(last) = self.values.last_mut() {
            *last = next;
        }
    }
}

/// Builds model input windows of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct SequenceBuilder {
    window_length: usize,
}

impl SequenceBuilder {
    pub fn new(window_length: usize) -> Result<Self> {
        if window_length == 0 {
            return Err(Error::Config("window_length must be > 0".into()));
        }
        Ok(Self { window_length })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Scale the whole series and keep its last `window_length` values.
    pub fn build_window(&self, series: &[f64], scaler: &dyn Scaler) -> Result<Window> {
        if series.len() < self.window_length {
            return Err(Error::InsufficientHistory {
                required: self.window_length,
                actual: series.len(),
            });
        }

        let scaled = scaler.forward(series);
        let start = scaled.len().saturating_sub(self.window_length);
        Ok(Window {
            values: scaled[start..].to_vec(),
        })
    }
}
