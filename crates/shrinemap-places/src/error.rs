use thiserror::Error;

/// Errors returned by the Places API client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a status other than `"OK"`, e.g.
    /// `"ZERO_RESULTS"`, `"REQUEST_DENIED"` or `"OVER_QUERY_LIMIT"`.
    #[error("Places API {operation} returned {status}")]
    Status {
        operation: &'static str,
        status: String,
        /// The `error_message` field, present for denied or invalid requests.
        message: Option<String>,
    },

    /// `findplacefromtext` returned `"OK"` with an empty candidate list.
    #[error("Places API returned no candidates for {query:?}")]
    NoCandidates { query: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl PlacesError {
    /// The provider status string, when the provider produced one.
    #[must_use]
    pub fn provider_status(&self) -> Option<&str> {
        match self {
            PlacesError::Status { status, .. } => Some(status),
            PlacesError::NoCandidates { .. } => Some("ZERO_RESULTS"),
            _ => None,
        }
    }
}
