use std::net::SocketAddr;

use crate::geo::{LatLng, RegionBounds};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Marker clustering knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Side length in pixels of one clustering grid cell.
    pub grid_size_px: u32,
    /// Highest zoom level at which markers are still grouped.
    pub max_zoom: u8,
    /// Smallest group rendered as a cluster glyph.
    pub min_cluster_size: usize,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            grid_size_px: 50,
            max_zoom: 15,
            min_cluster_size: 2,
        }
    }
}

/// The initial map view before data arrives, plus provider display options.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefaults {
    pub center: LatLng,
    pub zoom: u8,
    /// Map label language. Read from `SHRINEMAP_PLACES_LANGUAGE` and also
    /// used as the Places request language, so labels and place details
    /// always come back in the same language.
    pub language: String,
    pub region_code: String,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            center: LatLng::new(35.6762, 139.6503),
            zoom: 13,
            language: "ja".to_string(),
            region_code: "JP".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Filesystem path or `http(s)://` URL of the GeoJSON FeatureCollection.
    pub data_source: String,
    pub places_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub lookup_timeout_secs: u64,
    pub places_max_retries: u32,
    pub region: RegionBounds,
    pub cluster: ClusterSettings,
    pub view: ViewDefaults,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("data_source", &self.data_source)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("places_max_retries", &self.places_max_retries)
            .field("region", &self.region)
            .field("cluster", &self.cluster)
            .field("view", &self.view)
            .finish()
    }
}
