pub mod api;
pub mod client;
pub mod error;
pub mod normalize;
pub(crate) mod retry;
pub mod types;

pub use api::PlacesApi;
pub use client::PlacesClient;
pub use error::PlacesError;
pub use normalize::normalize_place;
pub use types::{PlaceCandidate, PlaceDetails, PlaceReview, DETAIL_FIELDS};
