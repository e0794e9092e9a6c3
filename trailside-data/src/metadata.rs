//! Host application metadata loaded from a JSON object file.

use std::collections::BTreeMap;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;
use thiserror::Error;
use trailside_core::config::HostMetadata;

/// Errors raised while loading a metadata file.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The file could not be read.
    #[error("failed to read metadata file {path}: {source}")]
    Read {
        /// File location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON.
    #[error("metadata is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The top-level JSON value is not an object.
    #[error("metadata must be a JSON object")]
    NotObject,
}

/// Flat string metadata, equivalent to a bundle's info dictionary.
///
/// Only string values are kept; other JSON values are treated as absent so a
/// mistyped entry surfaces as a missing key during configuration.
///
/// # Examples
/// ```
/// use trailside_core::config::HostMetadata;
/// use trailside_data::MetadataFile;
///
/// let metadata = MetadataFile::from_json_str(r#"{"WS_BASE_URL": "https://ws.example.com", "RETRIES": 3}"#)
///     .expect("valid metadata");
/// assert_eq!(metadata.value("WS_BASE_URL"), Some("https://ws.example.com"));
/// assert_eq!(metadata.value("RETRIES"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFile {
    values: BTreeMap<String, String>,
}

impl MetadataFile {
    /// Read and parse the metadata file at `path`.
    ///
    /// # Errors
    /// [`MetadataError::Read`] if the file cannot be read, otherwise as
    /// [`Self::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, MetadataError> {
        let raw = trailside_fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_owned(),
            source,
        })?;
        let metadata = Self::from_json_str(&raw)?;
        log::debug!("loaded {} metadata entries from {path}", metadata.len());
        Ok(metadata)
    }

    /// Parse metadata from JSON text.
    ///
    /// # Errors
    /// [`MetadataError::Parse`] for invalid JSON and
    /// [`MetadataError::NotObject`] when the top level is not an object.
    pub fn from_json_str(raw: &str) -> Result<Self, MetadataError> {
        let Value::Object(entries) = serde_json::from_str::<Value>(raw)? else {
            return Err(MetadataError::NotObject);
        };
        let values = entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                other => {
                    log::debug!("ignoring non-string metadata entry {key}: {other}");
                    None
                }
            })
            .collect();
        Ok(Self { values })
    }

    /// Number of string entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no string entries were loaded.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl HostMetadata for MetadataFile {
    fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;
    use trailside_core::config::{ConfigError, Configuration, MAP_API_KEY_KEY};

    const COMPLETE: &str = r#"{
        "ACCUTERRA_MAP_STYLE_URL": "https://maps.example.com/style.json",
        "ACCUTERRA_MAP_API_KEY": "key",
        "WS_BASE_URL": "https://ws.example.com",
        "WS_AUTH_URL": "https://auth.example.com"
    }"#;

    #[rstest]
    #[case("[]")]
    #[case("\"text\"")]
    fn non_object_is_rejected(#[case] raw: &str) {
        assert!(matches!(
            MetadataFile::from_json_str(raw),
            Err(MetadataError::NotObject)
        ));
    }

    #[rstest]
    fn non_string_value_counts_as_missing() {
        let raw = COMPLETE.replace("\"key\"", "42");
        let metadata = MetadataFile::from_json_str(&raw).expect("valid json");

        let err = Configuration::resolve(&metadata).expect_err("api key is not a string");

        assert_eq!(
            err,
            ConfigError::MissingKey {
                key: MAP_API_KEY_KEY
            }
        );
    }

    #[rstest]
    fn loads_from_disk() {
        let temp = TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().join("Info.json")).expect("utf-8 path");
        trailside_fs::write_string(&path, COMPLETE).expect("write metadata");

        let metadata = MetadataFile::load(&path).expect("metadata loads");

        assert_eq!(metadata.len(), 4);
        assert!(Configuration::resolve(&metadata).is_ok());
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let err = MetadataFile::load(Utf8Path::new("/nonexistent/trailside/Info.json"))
            .expect_err("file is absent");
        assert!(matches!(err, MetadataError::Read { .. }));
    }
}
