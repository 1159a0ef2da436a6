//! Forecast engine crate.
//!
//! Lazily loads (model, scaler) pairs per location, builds input windows, and
//! runs the autoregressive rollout.

pub mod cache;
pub mod engine;
pub mod window;

pub use cache::{LocationModels, ModelCache, ModelPair};
pub use engine::ForecastEngine;
pub use window::{SequenceBuilder, Window};
