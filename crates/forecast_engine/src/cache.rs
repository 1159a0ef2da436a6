//! Per-location model cache.
//!
//! Entries are populated on first access by scanning the artifact store and
//! live for the rest of the process unless explicitly invalidated. Populated
//! entries are read straight out of the `DashMap`; concurrent first loads of
//! the same location wait on a per-location lock so the scan runs once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use artifact_store::naming::{self, ArtifactKind};
use artifact_store::{load_predictor, load_scaler, ArtifactStore, Predictor, Scaler};
use common::{LocationId, Result, SeriesKey};
use dashmap::DashMap;
use tracing::{debug, info, warn};

/// A usable (model, scaler) pair for one series key.
#[derive(Clone)]
pub struct ModelPair {
    pub model: Arc<dyn Predictor>,
    pub scaler: Arc<dyn Scaler>,
}

/// Series key → usable pair, for one location.
pub type LocationModels = HashMap<SeriesKey, ModelPair>;

pub struct ModelCache {
    store: Arc<dyn ArtifactStore>,
    entries: DashMap<LocationId, Arc<LocationModels>>,
    load_locks: DashMap<LocationId, Arc<Mutex<()>>>,
}

impl ModelCache {
    pub fn new(store: Arc<dyn ArtifactStore>) -> Self {
        Self {
            store,
            entries: DashMap::new(),
            load_locks: DashMap::new(),
        }
    }

    /// Cached models for `location`, scanning the store on first access.
    ///
    /// An empty map is a valid result and is cached like any other.
    pub fn get_or_load(&self, location: &LocationId) -> Result<Arc<LocationModels>> {
        if let Some(entry) = self.entries.get(location) {
            return Ok(Arc::clone(entry.value()));
        }

        let lock = Arc::clone(
            self.load_locks
                .entry(location.clone())
                .or_default()
                .value(),
        );
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        // Another caller may have finished the scan while we waited.
        if let Some(entry) = self.entries.get(location) {
            return Ok(Arc::clone(entry.value()));
        }

        let models = Arc::new(self.scan(location)?);
        self.entries.insert(location.clone(), Arc::clone(&models));
        Ok(models)
    }

    /// Seed an entry without touching the store. Replaces any existing entry.
    pub fn insert(&self, location: LocationId, models: LocationModels) {
        self.entries.insert(location, Arc::new(models));
    }

    /// Forget `location` so the next `get_or_load` rescans the store.
    pub fn invalidate(&self, location: &LocationId) -> bool {
        let removed = self.entries.remove(location).is_some();
        if removed {
            info!("Invalidated cached models for location {}", location);
        }
        removed
    }

    pub fn cached_locations(&self) -> Vec<LocationId> {
        let mut locations: Vec<LocationId> =
            self.entries.iter().map(|e| e.key().clone()).collect();
        locations.sort();
        locations
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn scan(&self, location: &LocationId) -> Result<LocationModels> {
        let prefix = naming::location_prefix(location);
        let candidates = self.store.list(ArtifactKind::Model, &prefix)?;
        info!(
            "Loading models for location {}: {} candidate file(s)",
            location,
            candidates.len()
        );

        let mut models = LocationModels::new();
        let mut skipped = 0usize;
        for file_name in &candidates {
            match self.load_pair(location, file_name) {
                Ok((key, pair)) => {
                    if models.contains_key(&key) {
                        warn!(
                            "Skipping {}: series {} already loaded for location {}",
                            file_name, key, location
                        );
                        skipped += 1;
                        continue;
                    }
                    debug!("Loaded model and scaler for {}/{}", location, key);
                    models.insert(key, pair);
                }
                Err(e) if e.is_recoverable_during_scan() => {
                    warn!("Skipping {}: {}", file_name, e);
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Location {}: {} model(s) loaded, {} skipped",
            location,
            models.len(),
            skipped
        );
        Ok(models)
    }

    fn load_pair(&self, location: &LocationId, model_file: &str) -> Result<(SeriesKey, ModelPair)> {
        let key = naming::parse_series_key(ArtifactKind::Model, location, model_file)?;

        let scaler_file = naming::artifact_name(ArtifactKind::Scaler, location, &key);
        let scaler_bytes = self.store.load(ArtifactKind::Scaler, &scaler_file)?;
        let model_bytes = self.store.load(ArtifactKind::Model, model_file)?;

        let pair = ModelPair {
            model: load_predictor(model_file, &model_bytes)?,
            scaler: load_scaler(&scaler_file, &scaler_bytes)?,
        };
        Ok((key, pair))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_store::MemoryArtifactStore;
    use common::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MODEL: &str = r#"{"format_version":1,"kind":"linear","weights":[0.5,0.5],"bias":0.0}"#;
    const SCALER: &str = r#"{"format_version":1,"kind":"min_max","data_min":0.0,"data_max":100.0}"#;

    /// Wraps a memory store and counts every I/O call.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryArtifactStore,
        lists: AtomicUsize,
        loads: AtomicUsize,
    }

    impl CountingStore {
        fn io_calls(&self) -> usize {
            self.lists.load(Ordering::SeqCst) + self.loads.load(Ordering::SeqCst)
        }
    }

    impl ArtifactStore for CountingStore {
        fn list(&self, kind: ArtifactKind, prefix: &str) -> Result<Vec<String>> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list(kind, prefix)
        }

        fn load(&self, kind: ArtifactKind, name: &str) -> Result<Vec<u8>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            self.inner.load(kind, name)
        }
    }

    /// Store whose listing always fails.
    struct BrokenStore;

    impl ArtifactStore for BrokenStore {
        fn list(&self, _: ArtifactKind, _: &str) -> Result<Vec<String>> {
            Err(Error::Io(std::io::Error::other("disk on fire")))
        }

        fn load(&self, _: ArtifactKind, name: &str) -> Result<Vec<u8>> {
            Err(Error::artifact_load(name, "unreachable"))
        }
    }

    fn add_pair(store: &MemoryArtifactStore, location: u32, key: u32) {
        let loc = LocationId::from(location);
        let key = SeriesKey::from(key);
        store.insert(
            ArtifactKind::Model,
            naming::artifact_name(ArtifactKind::Model, &loc, &key),
            MODEL,
        );
        store.insert(
            ArtifactKind::Scaler,
            naming::artifact_name(ArtifactKind::Scaler, &loc, &key),
            SCALER,
        );
    }

    fn sorted_keys(models: &LocationModels) -> Vec<SeriesKey> {
        let mut keys: Vec<SeriesKey> = models.keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_second_call_performs_no_io() {
        let store = Arc::new(CountingStore::default());
        add_pair(&store.inner, 1, 4);
        add_pair(&store.inner, 1, 5);
        let cache = ModelCache::new(store.clone());
        let loc = LocationId::from(1u32);

        let first = cache.get_or_load(&loc).unwrap();
        let io_after_first = store.io_calls();
        assert!(io_after_first > 0);

        let second = cache.get_or_load(&loc).unwrap();
        assert_eq!(store.io_calls(), io_after_first);
        assert_eq!(sorted_keys(&first), sorted_keys(&second));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_scaler_is_dropped_without_error() {
        let store = Arc::new(MemoryArtifactStore::new());
        add_pair(&store, 7, 2);
        add_pair(&store, 7, 4);
        let loc = LocationId::from(7u32);
        store.insert(
            ArtifactKind::Model,
            naming::artifact_name(ArtifactKind::Model, &loc, &SeriesKey::from(9u32)),
            MODEL,
        );

        let cache = ModelCache::new(store);
        let models = cache.get_or_load(&loc).unwrap();
        assert_eq!(
            sorted_keys(&models),
            vec![SeriesKey::from(2u32), SeriesKey::from(4u32)]
        );
    }

    #[test]
    fn test_corrupt_and_unparsable_artifacts_do_not_abort_scan() {
        let store = Arc::new(MemoryArtifactStore::new());
        add_pair(&store, 3, 10);
        let loc = LocationId::from(3u32);

        // Corrupt model body.
        let bad_key = SeriesKey::from(11u32);
        store.insert(
            ArtifactKind::Model,
            naming::artifact_name(ArtifactKind::Model, &loc, &bad_key),
            "not json",
        );
        store.insert(
            ArtifactKind::Scaler,
            naming::artifact_name(ArtifactKind::Scaler, &loc, &bad_key),
            SCALER,
        );
        // Version-incompatible scaler.
        let old_key = SeriesKey::from(12u32);
        store.insert(
            ArtifactKind::Model,
            naming::artifact_name(ArtifactKind::Model, &loc, &old_key),
            MODEL,
        );
        store.insert(
            ArtifactKind::Scaler,
            naming::artifact_name(ArtifactKind::Scaler, &loc, &old_key),
            r#"{"format_version":0,"kind":"min_max","data_min":0.0,"data_max":1.0}"#,
        );
        // No key in the name.
        store.insert(ArtifactKind::Model, "district_3_commodity_.model.json", MODEL);

        let cache = ModelCache::new(store);
        let models = cache.get_or_load(&loc).unwrap();
        assert_eq!(sorted_keys(&models), vec![SeriesKey::from(10u32)]);
    }

    #[test]
    fn test_location_ids_sharing_a_prefix_stay_apart() {
        let store = Arc::new(MemoryArtifactStore::new());
        let own = LocationId::from("1");
        let other = LocationId::from("1_x");
        let key = SeriesKey::from(4u32);
        store.insert(
            ArtifactKind::Model,
            naming::artifact_name(ArtifactKind::Model, &own, &key),
            r#"{"format_version":1,"kind":"linear","weights":[1.0,0.0],"bias":0.0}"#,
        );
        store.insert(
            ArtifactKind::Scaler,
            naming::artifact_name(ArtifactKind::Scaler, &own, &key),
            r#"{"format_version":1,"kind":"standard","mean":0.0,"scale":1.0}"#,
        );
        store.insert(
            ArtifactKind::Model,
            naming::artifact_name(ArtifactKind::Model, &other, &key),
            r#"{"format_version":1,"kind":"linear","weights":[0.0,0.0],"bias":999.0}"#,
        );

        let cache = ModelCache::new(store);
        let models = cache.get_or_load(&own).unwrap();
        assert_eq!(sorted_keys(&models), vec![key.clone()]);
        let next = models[&key].model.predict_next(&[5.0, 7.0]).unwrap();
        assert_eq!(next, 5.0);

        assert!(cache.get_or_load(&other).unwrap().is_empty());
    }

    #[test]
    fn test_empty_location_is_cached() {
        let store = Arc::new(CountingStore::default());
        add_pair(&store.inner, 1, 4);
        let cache = ModelCache::new(store.clone());
        let loc = LocationId::from(2u32);

        assert!(cache.get_or_load(&loc).unwrap().is_empty());
        let calls = store.io_calls();
        assert!(cache.get_or_load(&loc).unwrap().is_empty());
        assert_eq!(store.io_calls(), calls);
        assert_eq!(cache.cached_locations(), vec![loc]);
    }

    #[test]
    fn test_list_failure_is_not_cached() {
        let cache = ModelCache::new(Arc::new(BrokenStore));
        let loc = LocationId::from(1u32);
        assert!(matches!(cache.get_or_load(&loc), Err(Error::Io(_))));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_picks_up_new_artifacts() {
        let store = Arc::new(MemoryArtifactStore::new());
        add_pair(&store, 5, 1);
        let cache = ModelCache::new(store.clone());
        let loc = LocationId::from(5u32);

        assert_eq!(cache.get_or_load(&loc).unwrap().len(), 1);
        add_pair(&store, 5, 2);
        assert_eq!(cache.get_or_load(&loc).unwrap().len(), 1, "no silent refresh");

        assert!(cache.invalidate(&loc));
        assert_eq!(cache.get_or_load(&loc).unwrap().len(), 2);
        assert!(!cache.invalidate(&LocationId::from(99u32)));
    }

    #[test]
    fn test_concurrent_first_access_scans_once() {
        let store = Arc::new(CountingStore::default());
        for key in 1..=5 {
            add_pair(&store.inner, 8, key);
        }
        let cache = ModelCache::new(store.clone());
        let loc = LocationId::from(8u32);

        let results: Vec<Arc<LocationModels>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.get_or_load(&loc).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.lists.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
        assert_eq!(results[0].len(), 5);
    }
}
