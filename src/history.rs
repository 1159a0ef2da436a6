//! CSV-backed historical observations.
//!
//! One row per observation; rows are filtered by location and series columns
//! and the value column is returned in file order (assumed chronological).

use common::config::HistoryConfig;
use common::{Error, LocationId, Result, SeriesKey};
use tracing::{debug, info};

pub struct CsvHistorySource {
    config: HistoryConfig,
}

/// Ids may be written as `7` or `7.0` depending on the exporter.
fn id_matches(field: &str, id: &str) -> bool {
    let field = field.trim();
    if field == id {
        return true;
    }
    match (field.parse::<f64>(), id.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl CsvHistorySource {
    pub fn new(config: HistoryConfig) -> Self {
        Self { config }
    }

    /// Values for one (location, series) pair, oldest first.
    pub fn series(&self, location: &LocationId, key: &SeriesKey) -> Result<Vec<f64>> {
        let path = &self.config.csv_path;
        if !path.exists() {
            return Err(Error::History(format!(
                "historical data not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| Error::History(format!("cannot open {}: {}", path.display(), e)))?;
        let headers = reader
            .headers()
            .map_err(|e| Error::History(e.to_string()))?
            .clone();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| Error::History(format!("column '{}' not found", name)))
        };
        let loc_idx = column(self.config.location_column.as_str())?;
        let key_idx = column(self.config.key_column.as_str())?;
        let value_idx = column(self.config.value_column.as_str())?;

        let mut values = Vec::new();
        let mut rows = 0usize;
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| Error::History(e.to_string()))?;
            rows += 1;
            let (Some(loc), Some(k)) = (record.get(loc_idx), record.get(key_idx)) else {
                continue;
            };
            if !id_matches(loc, location.as_str()) || !id_matches(k, key.as_str()) {
                continue;
            }
            match record.get(value_idx).map(|v| v.trim().parse::<f64>()) {
                Some(Ok(v)) if v.is_finite() => values.push(v),
                _ => skipped += 1,
            }
        }

        info!(
            "History for location {} series {}: {} value(s) from {} row(s)",
            location,
            key,
            values.len(),
            rows
        );
        if skipped > 0 {
            debug!("Skipped {} unparsable value(s)", skipped);
        }
        Ok(values)
    }
}
