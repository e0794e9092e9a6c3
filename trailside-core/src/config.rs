//! Resolve the immutable SDK configuration from host application metadata.
//!
//! Every key in [`REQUIRED_KEYS`] must be present and non-blank. There are no
//! defaults for them: configuration is a startup precondition, and callers are
//! expected to terminate when [`Configuration::resolve`] fails.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use thiserror::Error;
use url::Url;

/// Base URL of the map style.
pub const MAP_STYLE_URL_KEY: &str = "ACCUTERRA_MAP_STYLE_URL";
/// API key appended to the map style URL.
pub const MAP_API_KEY_KEY: &str = "ACCUTERRA_MAP_API_KEY";
/// Base URL of the trail web service.
pub const WS_BASE_URL_KEY: &str = "WS_BASE_URL";
/// Authentication URL of the trail web service.
pub const WS_AUTH_URL_KEY: &str = "WS_AUTH_URL";

/// Metadata keys that must be configured before start-up.
pub const REQUIRED_KEYS: [&str; 4] = [
    MAP_STYLE_URL_KEY,
    MAP_API_KEY_KEY,
    WS_BASE_URL_KEY,
    WS_AUTH_URL_KEY,
];

/// Satellite imagery style used when no imagery style is configured.
pub const DEFAULT_IMAGERY_STYLE_URL: &str = "mapbox://styles/mapbox/satellite-v9";

/// Read-only key/value metadata bundled with the host application.
pub trait HostMetadata {
    /// Return the string value for `key`, if any.
    fn value(&self, key: &str) -> Option<&str>;
}

impl<S: BuildHasher> HostMetadata for HashMap<String, String, S> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl HostMetadata for BTreeMap<String, String> {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

/// Errors returned by [`Configuration::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required key is absent or blank.
    #[error("{key} is missing or not configured in host metadata")]
    MissingKey {
        /// The offending metadata key.
        key: &'static str,
    },
    /// A URL-valued key could not be parsed.
    #[error("{key} is not a valid URL: {message}")]
    InvalidUrl {
        /// The offending metadata key.
        key: &'static str,
        /// Parser error description.
        message: String,
    },
}

/// Trail web service endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Service base URL.
    pub ws_url: Url,
    /// Service authentication URL.
    pub ws_auth_url: Url,
}

/// Vector map style source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapStyleConfig {
    /// Style base URL without the API key.
    pub style_url: Url,
    /// Key authorizing style requests.
    pub api_key: String,
}

/// Network types over which trip recordings may be uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadNetworkType {
    /// Any connected network.
    #[default]
    Connected,
    /// Unmetered networks only.
    Unmetered,
}

/// Trip recording upload policy.
#[derive(Debug, Clone, PartialEq)]
pub struct TripConfig {
    /// Network constraint for uploads.
    pub upload_network_type: UploadNetworkType,
    /// Whether recordings are deleted once uploaded.
    pub delete_recording_after_upload: bool,
    /// Attachments larger than this many megabytes are split.
    pub attachment_split_size_limit_mb: f64,
    /// Chunk size in megabytes for split attachments.
    pub attachment_split_chunk_size_mb: f64,
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            upload_network_type: UploadNetworkType::Connected,
            delete_recording_after_upload: false,
            attachment_split_size_limit_mb: 2.0,
            attachment_split_chunk_size_mb: 1.0,
        }
    }
}

/// When the SDK builds its trail feature cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailFeatureCacheMode {
    /// Build the cache while the SDK initializes. Increases launch time.
    #[default]
    CacheTrailsDuringSdkInit,
    /// Build the cache the first time trails are requested.
    CacheOnDemand,
    /// Never cache trail features.
    Disabled,
}

/// Trail data synchronization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrailConfig {
    /// Trail feature cache policy.
    pub cache_mode: TrailFeatureCacheMode,
    /// Refresh the trail database during initialization.
    pub update_trail_db_during_init: bool,
    /// Refresh user data (likes, favourites) during initialization.
    pub update_user_data_during_init: bool,
    /// Refresh dynamic data (ratings, closures) during initialization.
    pub update_dynamic_data_during_init: bool,
}

/// Immutable SDK configuration built once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    /// Web service endpoints.
    pub endpoints: EndpointConfig,
    /// Vector map style.
    pub map_style: MapStyleConfig,
    /// Imagery (satellite) style.
    pub imagery_style_url: Url,
    /// Trip upload policy.
    pub trips: TripConfig,
    /// Trail caching policy.
    pub trails: TrailConfig,
}

impl Configuration {
    /// Read every required key from `metadata`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingKey`] for the first absent or blank key
    /// and [`ConfigError::InvalidUrl`] when a URL key does not parse.
    ///
    /// # Examples
    /// ```
    /// use std::collections::HashMap;
    /// use trailside_core::config::{Configuration, REQUIRED_KEYS};
    ///
    /// let metadata: HashMap<String, String> = REQUIRED_KEYS
    ///     .iter()
    ///     .map(|key| (key.to_string(), "https://example.com/".to_string()))
    ///     .collect();
    /// let config = Configuration::resolve(&metadata).expect("all keys present");
    /// assert_eq!(config.endpoints.ws_url.as_str(), "https://example.com/");
    /// ```
    pub fn resolve(metadata: &impl HostMetadata) -> Result<Self, ConfigError> {
        let style_url = required_url(metadata, MAP_STYLE_URL_KEY)?;
        let api_key = required(metadata, MAP_API_KEY_KEY)?.to_owned();
        let ws_url = required_url(metadata, WS_BASE_URL_KEY)?;
        let ws_auth_url = required_url(metadata, WS_AUTH_URL_KEY)?;
        let imagery_style_url =
            Url::parse(DEFAULT_IMAGERY_STYLE_URL).map_err(|err| ConfigError::InvalidUrl {
                key: "imagery style",
                message: err.to_string(),
            })?;
        Ok(Self {
            endpoints: EndpointConfig {
                ws_url,
                ws_auth_url,
            },
            map_style: MapStyleConfig { style_url, api_key },
            imagery_style_url,
            trips: TripConfig::default(),
            trails: TrailConfig::default(),
        })
    }

    /// Style URL with the API key attached as the `key` query parameter.
    ///
    /// # Examples
    /// ```
    /// use std::collections::HashMap;
    /// use trailside_core::config::Configuration;
    ///
    /// let metadata = HashMap::from([
    ///     ("ACCUTERRA_MAP_STYLE_URL".to_string(), "https://maps.example.com/style.json".to_string()),
    ///     ("ACCUTERRA_MAP_API_KEY".to_string(), "abc123".to_string()),
    ///     ("WS_BASE_URL".to_string(), "https://ws.example.com".to_string()),
    ///     ("WS_AUTH_URL".to_string(), "https://auth.example.com".to_string()),
    /// ]);
    /// let config = Configuration::resolve(&metadata).expect("complete metadata");
    /// assert_eq!(
    ///     config.map_style_url().as_str(),
    ///     "https://maps.example.com/style.json?key=abc123"
    /// );
    /// ```
    pub fn map_style_url(&self) -> Url {
        let mut url = self.map_style.style_url.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.map_style.api_key);
        url
    }
}

fn required<'a>(metadata: &'a impl HostMetadata, key: &'static str) -> Result<&'a str, ConfigError> {
    metadata
        .value(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingKey { key })
}

fn required_url(metadata: &impl HostMetadata, key: &'static str) -> Result<Url, ConfigError> {
    let raw = required(metadata, key)?;
    Url::parse(raw).map_err(|err| ConfigError::InvalidUrl {
        key,
        message: err.to_string(),
    })
}
