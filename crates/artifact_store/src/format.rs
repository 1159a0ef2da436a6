//! Versioned JSON envelope shared by every artifact kind.

use common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The only artifact layout this build understands.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Deserialize)]
struct VersionProbe {
    format_version: Option<u32>,
}

/// Decode an artifact body after checking its `format_version`.
pub fn decode<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T> {
    let probe: VersionProbe = serde_json::from_slice(bytes)
        .map_err(|e| Error::artifact_load(name, format!("corrupt artifact: {e}")))?;

    match probe.format_version {
        Some(FORMAT_VERSION) => {}
        Some(other) => {
            return Err(Error::artifact_load(
                name,
                format!("version-incompatible: format_version={other}, expected {FORMAT_VERSION}"),
            ));
        }
        None => return Err(Error::artifact_load(name, "missing format_version")),
    }

    serde_json::from_slice(bytes)
        .map_err(|e| Error::artifact_load(name, format!("corrupt artifact: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        value: f64,
    }

    #[test]
    fn test_decode_current_version() {
        let body: Body = decode("a", br#"{"format_version":1,"value":2.5}"#).unwrap();
        assert_eq!(body.value, 2.5);
    }

    #[test]
    fn test_rejects_other_versions() {
        let err = decode::<Body>("a", br#"{"format_version":2,"value":2.5}"#).unwrap_err();
        assert!(err.to_string().contains("version-incompatible"));
    }

    #[test]
    fn test_rejects_missing_version_and_garbage() {
        assert!(matches!(
            decode::<Body>("a", br#"{"value":2.5}"#),
            Err(Error::ArtifactLoad { .. })
        ));
        assert!(matches!(
            decode::<Body>("a", b"\x00\x01not json"),
            Err(Error::ArtifactLoad { .. })
        ));
    }
}
