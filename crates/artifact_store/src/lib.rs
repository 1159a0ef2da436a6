//! Persisted model and scaler artifacts.
//!
//! Owns the on-disk naming scheme, the store abstraction used to list and
//! fetch artifacts, and the capability traits (`Predictor`, `Scaler`) the
//! forecast engine depends on, with one adapter per persisted format.

pub mod format;
pub mod model;
pub mod naming;
pub mod scaler;
pub mod store;

pub use model::{load_predictor, LinearWindowModel, Predictor, SerializedPredictor, StatefulPredictor};
pub use naming::ArtifactKind;
pub use scaler::{load_scaler, MinMaxScaler, Scaler, StandardScaler};
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
