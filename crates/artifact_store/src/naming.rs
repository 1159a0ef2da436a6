//! Artifact naming scheme.
//!
//! Models and scalers share the stem `district_{location}_commodity_{key}`
//! and differ only by extension and directory.

use common::{Error, LocationId, Result, SeriesKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Model => ".model.json",
            ArtifactKind::Scaler => ".scaler.json",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Scaler => "scaler",
        }
    }
}

/// Prefix shared by every artifact of `location`, up to the series key.
///
/// Ending at `commodity_` keeps location `1` from matching `10` or `1_x`.
pub fn location_prefix(location: &LocationId) -> String {
    format!("district_{}_commodity_", location)
}

pub fn artifact_stem(location: &LocationId, key: &SeriesKey) -> String {
    format!("district_{}_commodity_{}", location, key)
}

pub fn artifact_name(kind: ArtifactKind, location: &LocationId, key: &SeriesKey) -> String {
    format!("{}{}", artifact_stem(location, key), kind.extension())
}

/// Recover the series key embedded in an artifact file name.
///
/// Everything after `district_{location}_commodity_` must be the key.
pub fn parse_series_key(
    kind: ArtifactKind,
    location: &LocationId,
    file_name: &str,
) -> Result<SeriesKey> {
    let stem = file_name
        .strip_suffix(kind.extension())
        .ok_or_else(|| Error::artifact_load(file_name, "unexpected file extension"))?;
    let key = stem
        .strip_prefix(&location_prefix(location))
        .ok_or_else(|| Error::artifact_load(file_name, "name does not match location"))?;

    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::artifact_load(
            file_name,
            format!("unparsable series key {key:?}"),
        ));
    }

    Ok(SeriesKey::from(key))
}
