//! Domain types shared across the forecaster.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Identifiers ───────────────────────────────────────────────────────

/// Geographic/administrative unit that owns a distinct set of models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

/// Forecast target within a location (e.g. a commodity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesKey(String);

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }
    };
}

opaque_id!(LocationId);
opaque_id!(SeriesKey);

// ── Forecast output ───────────────────────────────────────────────────

/// One forecast step in the original (unscaled) value domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    #[serde(rename = "predicted_date")]
    pub date: NaiveDate,
    #[serde(rename = "predicted_price")]
    pub value: f64,
}
