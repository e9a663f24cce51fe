//! Two-step place lookup for a selected record.
//!
//! Resolve the record to a place id with a `"{name} {address}"` query, then
//! fetch the detail field set. Provider failures are folded into
//! [`LookupError`] so that the panel has a single error type to show.

use std::sync::Arc;
use std::time::Duration;

use shrinemap_data::DisplayRecord;
use shrinemap_places::{PlaceDetails, PlacesApi, PlacesError};

use crate::error::LookupError;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Looks up provider details for records.
///
/// Starts detached; [`PlaceEnricher::attach`] supplies the client once the
/// map surface is live. Cloning is cheap and shares the client.
pub struct PlaceEnricher<P> {
    client: Option<Arc<P>>,
    timeout: Duration,
}

impl<P> Clone for PlaceEnricher<P> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            timeout: self.timeout,
        }
    }
}

impl<P> std::fmt::Debug for PlaceEnricher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceEnricher")
            .field("available", &self.client.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<P: PlacesApi> PlaceEnricher<P> {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: None,
            timeout,
        }
    }

    pub fn attach(&mut self, client: Arc<P>) {
        self.client = Some(client);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Resolves `record` and fetches its details within the timeout.
    ///
    /// # Errors
    ///
    /// - [`LookupError::ProviderUnavailable`] when no client is attached. No
    ///   request is made.
    /// - [`LookupError::NotFound`] when the query matches nothing.
    /// - [`LookupError::DetailFetchFailed`] when the detail step is refused.
    /// - [`LookupError::Timeout`] when both steps together exceed the timeout.
    /// - [`LookupError::Transport`] for network or decoding failures.
    pub async fn lookup(&self, record: &DisplayRecord) -> Result<PlaceDetails, LookupError> {
        let Some(client) = self.client.as_deref() else {
            return Err(LookupError::ProviderUnavailable);
        };
        let query = lookup_query(record);

        match tokio::time::timeout(self.timeout, resolve_and_fetch(client, &query)).await {
            Ok(result) => {
                if let Err(error) = &result {
                    tracing::warn!(record = %record.id, %query, %error, "place lookup failed");
                }
                result
            }
            Err(_) => {
                tracing::warn!(record = %record.id, %query, timeout = ?self.timeout, "place lookup timed out");
                Err(LookupError::Timeout)
            }
        }
    }
}

async fn resolve_and_fetch<P: PlacesApi>(client: &P, query: &str) -> Result<PlaceDetails, LookupError> {
    let candidate = client
        .find_place(query)
        .await
        .map_err(|e| classify(e, LookupError::NotFound))?;
    tracing::debug!(query, place_id = %candidate.place_id, "place resolved");
    client
        .place_details(&candidate.place_id)
        .await
        .map_err(|e| classify(e, LookupError::DetailFetchFailed))
}

fn classify(error: PlacesError, with_status: fn(String) -> LookupError) -> LookupError {
    match error.provider_status() {
        Some(status) => with_status(status.to_owned()),
        None => LookupError::Transport(error.to_string()),
    }
}

/// `"{name} {address}"`, or just the name when there is no address.
#[must_use]
pub fn lookup_query(record: &DisplayRecord) -> String {
    match record.source.address() {
        Some(address) => format!("{} {address}", record.name()),
        None => record.name().to_owned(),
    }
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod tests;
