//! Artifact stores.
//!
//! The engine only needs two operations: list names by prefix, and fetch
//! one artifact by exact name. Format is opaque at this layer.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use common::config::ArtifactConfig;
use common::{Error, Result};
use tracing::debug;

use crate::naming::ArtifactKind;

pub trait ArtifactStore: Send + Sync {
    /// Names of `kind` artifacts starting with `prefix`, sorted.
    fn list(&self, kind: ArtifactKind, prefix: &str) -> Result<Vec<String>>;

    /// Raw bytes of one artifact. Missing or unreadable artifacts are
    /// `Error::ArtifactLoad`.
    fn load(&self, kind: ArtifactKind, name: &str) -> Result<Vec<u8>>;
}

// ── Filesystem ────────────────────────────────────────────────────────

/// Store backed by a models directory and a scalers directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    models_dir: PathBuf,
    scalers_dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(models_dir: impl Into<PathBuf>, scalers_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            scalers_dir: scalers_dir.into(),
        }
    }

    pub fn from_config(config: &ArtifactConfig) -> Self {
        Self::new(config.models_dir(), config.scalers_dir())
    }

    fn dir(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::Model => &self.models_dir,
            ArtifactKind::Scaler => &self.scalers_dir,
        }
    }
}

impl ArtifactStore for FsArtifactStore {
    fn list(&self, kind: ArtifactKind, prefix: &str) -> Result<Vec<String>> {
        let dir = self.dir(kind);
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} directory {} does not exist", kind.as_str(), dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.starts_with(prefix) && name.ends_with(kind.extension()) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, kind: ArtifactKind, name: &str) -> Result<Vec<u8>> {
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(Error::artifact_load(name, "artifact names may not contain paths"));
        }
        let path = self.dir(kind).join(name);
        std::fs::read(&path).map_err(|e| {
            Error::artifact_load(name, format!("cannot read {}: {}", path.display(), e))
        })
    }
}

// ── In-memory ─────────────────────────────────────────────────────────

/// In-process store, for embedding callers and tests.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: RwLock<HashMap<(ArtifactKind, String), Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, kind: ArtifactKind, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.artifacts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert((kind, name.into()), bytes.into());
    }

    pub fn remove(&self, kind: ArtifactKind, name: &str) -> bool {
        self.artifacts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&(kind, name.to_string()))
            .is_some()
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn list(&self, kind: ArtifactKind, prefix: &str) -> Result<Vec<String>> {
        let artifacts = self.artifacts.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = artifacts
            .keys()
            .filter(|(k, name)| *k == kind && name.starts_with(prefix))
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn load(&self, kind: ArtifactKind, name: &str) -> Result<Vec<u8>> {
        self.artifacts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(kind, name.to_string()))
            .cloned()
            .ok_or_else(|| Error::artifact_load(name, "not found"))
    }
}
