//! Places API response types.
//!
//! The raw types model the JSON returned by the Places Web Service. Every
//! response is wrapped in a `{"status": "OK", ...}` envelope; [`ApiResponse`]
//! captures that pattern generically. [`PlaceDetails`] is the remapped shape
//! handed to the viewer.

use serde::{Deserialize, Serialize};
use shrinemap_core::LatLng;

/// Fields requested from the `details` endpoint.
pub const DETAIL_FIELDS: &[&str] = &[
    "name",
    "formatted_address",
    "photos",
    "rating",
    "user_ratings_total",
    "opening_hours",
    "url",
    "formatted_phone_number",
    "reviews",
    "geometry",
];

/// Identity fields requested from `findplacefromtext`.
pub const FIND_FIELDS: &[&str] = &["place_id", "name"];

/// Top-level envelope for all Places API responses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub data: T,
}

// ---------------------------------------------------------------------------
// findplacefromtext
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    #[serde(default)]
    pub candidates: Vec<PlaceCandidate>,
}

/// A place matched by a text query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub result: PlaceResult,
}

/// The `result` object of a `details` response, restricted to
/// [`DETAIL_FIELDS`].
#[derive(Debug, Default, Deserialize)]
pub struct PlaceResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub opening_hours: Option<OpeningHours>,
    /// Canonical Google Maps page for the place.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
    #[serde(default)]
    pub geometry: Option<PlaceGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct OpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    /// One line per weekday, e.g. `"月曜日: 5時10分～18時00分"`.
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawReview {
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub relative_time_description: String,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceGeometry {
    pub location: GeometryLocation,
}

#[derive(Debug, Deserialize)]
pub struct GeometryLocation {
    pub lat: f64,
    pub lng: f64,
}

// ---------------------------------------------------------------------------
// remapped
// ---------------------------------------------------------------------------

/// Place details as shown in the detail panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub address: Option<String>,
    /// Photo references in provider order; resolve them through the photo
    /// endpoint to display.
    pub photo_refs: Vec<String>,
    pub rating: Option<f64>,
    pub rating_count: Option<u32>,
    pub opening_hours_text: Vec<String>,
    pub website_url: Option<String>,
    pub phone: Option<String>,
    pub reviews: Vec<PlaceReview>,
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceReview {
    pub text: String,
    pub author_name: String,
    pub relative_time: String,
}
