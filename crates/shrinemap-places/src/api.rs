//! The capability interface the viewer depends on.
//!
//! [`PlacesClient`] is the production implementation; tests substitute
//! in-memory fakes.

use std::future::Future;

use crate::client::PlacesClient;
use crate::error::PlacesError;
use crate::types::{PlaceCandidate, PlaceDetails};

/// Resolve-then-fetch access to a places provider.
pub trait PlacesApi: Send + Sync + 'static {
    /// Resolves a free-text query to a single place identity.
    fn find_place(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<PlaceCandidate, PlacesError>> + Send;

    /// Fetches the detail field set for a resolved place.
    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<PlaceDetails, PlacesError>> + Send;
}

impl PlacesApi for PlacesClient {
    fn find_place(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<PlaceCandidate, PlacesError>> + Send {
        PlacesClient::find_place(self, query)
    }

    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<PlaceDetails, PlacesError>> + Send {
        PlacesClient::place_details(self, place_id)
    }
}
