//! HTTP client for the Places Web Service JSON API.
//!
//! Wraps `reqwest` with Places-specific error handling, API key management
//! and typed response deserialization. Both endpoints check the `"status"`
//! field in the JSON envelope and surface anything but `"OK"` as
//! [`PlacesError::Status`].

use std::time::Duration;

use reqwest::{Client, Url};
use shrinemap_core::AppConfig;

use crate::error::PlacesError;
use crate::normalize::normalize_place;
use crate::retry::retry_with_backoff;
use crate::types::{
    ApiResponse, DetailsResponse, FindPlaceResponse, PlaceCandidate, PlaceDetails, DETAIL_FIELDS,
    FIND_FIELDS,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/";
const RETRY_BACKOFF_BASE_MS: u64 = 500;

/// Client for the Places Web Service.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    language: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl std::fmt::Debug for PlacesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlacesClient")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl PlacesClient {
    /// Creates a new client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("shrinemap/0.1 (place-enrichment)")
            .build()?;

        // Exactly one trailing slash, so that `join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            language: "ja".to_owned(),
            max_retries: 2,
            backoff_base_ms: RETRY_BACKOFF_BASE_MS,
        })
    }

    /// Builds a client from configuration, or `None` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, PlacesError> {
        let Some(api_key) = config.places_api_key.as_deref() else {
            return Ok(None);
        };
        let client = Self::new(api_key, config.request_timeout_secs)?
            .with_language(&config.view.language)
            .with_retries(config.places_max_retries, RETRY_BACKOFF_BASE_MS);
        Ok(Some(client))
    }

    /// Sets the `language` parameter sent with every request.
    #[must_use]
    pub fn with_language(mut self, language: &str) -> Self {
        language.clone_into(&mut self.language);
        self
    }

    /// Sets how many times a transient failure is retried.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Resolves a free-text query to the best matching place.
    ///
    /// Calls `findplacefromtext/json` requesting only identity fields.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if the API returns anything but `"OK"`.
    /// - [`PlacesError::NoCandidates`] if `"OK"` comes with no candidates.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn find_place(&self, query: &str) -> Result<PlaceCandidate, PlacesError> {
        let fields = FIND_FIELDS.join(",");
        let url = self.build_url(
            "findplacefromtext/json",
            &[
                ("input", query),
                ("inputtype", "textquery"),
                ("fields", &fields),
            ],
        );

        let url = &url;
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let body = self.request_json(url).await?;
            Self::check_status("findplacefromtext", &body)?;
            Ok(body)
        })
        .await?;

        let envelope: ApiResponse<FindPlaceResponse> =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("findplacefromtext(input={query})"),
                source: e,
            })?;

        let candidate = envelope
            .data
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| PlacesError::NoCandidates {
                query: query.to_owned(),
            })?;

        tracing::debug!(query, place_id = %candidate.place_id, "resolved place");
        Ok(candidate)
    }

    /// Fetches the detail field set for a place and remaps it.
    ///
    /// Calls `details/json` with [`DETAIL_FIELDS`].
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Status`] if the API returns anything but `"OK"`.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let fields = DETAIL_FIELDS.join(",");
        let url = self.build_url(
            "details/json",
            &[("place_id", place_id), ("fields", &fields)],
        );

        let url = &url;
        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
            let body = self.request_json(url).await?;
            Self::check_status("details", &body)?;
            Ok(body)
        })
        .await?;

        let envelope: ApiResponse<DetailsResponse> =
            serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
                context: format!("details(place_id={place_id})"),
                source: e,
            })?;

        Ok(normalize_place(envelope.data.result))
    }

    /// Builds the full request URL with percent-encoded query parameters.
    ///
    /// `language` and `key` are appended after the endpoint parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(endpoint)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("language", &self.language);
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the response
    /// body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Checks the top-level `"status"` field and returns an error unless it
    /// is `"OK"`.
    fn check_status(operation: &'static str, body: &serde_json::Value) -> Result<(), PlacesError> {
        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("MISSING_STATUS");
        if status == "OK" {
            return Ok(());
        }
        let message = body
            .get("error_message")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned);
        Err(PlacesError::Status {
            operation,
            status: status.to_owned(),
            message,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
