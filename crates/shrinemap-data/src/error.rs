use shrinemap_core::LatLng;
use thiserror::Error;

/// Failure to obtain a usable FeatureCollection.
///
/// Callers treat every variant the same way: the record set becomes empty and
/// the error is shown as an inline notice. Nothing is retried.
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection { context: String },
}

/// Why a single feature was left out of the normalized set.
///
/// Exclusions are diagnostics only; they never surface to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExclusionReason {
    #[error("feature has no name")]
    MissingName,

    #[error("feature has no geometry or coordinates")]
    MissingGeometry,

    #[error("unsupported geometry type {0:?}")]
    UnsupportedGeometry(String),

    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(&'static str),

    #[error("computed center {0} is not a usable coordinate")]
    UnusableCenter(LatLng),

    #[error("center {0} is outside the configured region")]
    OutsideRegion(LatLng),
}
