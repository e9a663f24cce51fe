//! Remapping of raw `details` results into [`PlaceDetails`].
//!
//! This is a field-name translation; no values are reinterpreted. The one
//! rename worth noting is `url` → `website_url`.

use shrinemap_core::LatLng;

use crate::types::{PlaceDetails, PlaceResult, PlaceReview};

/// Converts a raw [`PlaceResult`] into [`PlaceDetails`].
#[must_use]
pub fn normalize_place(result: PlaceResult) -> PlaceDetails {
    PlaceDetails {
        name: result.name,
        address: result.formatted_address,
        photo_refs: result
            .photos
            .into_iter()
            .map(|photo| photo.photo_reference)
            .collect(),
        rating: result.rating,
        rating_count: result.user_ratings_total,
        opening_hours_text: result
            .opening_hours
            .map(|hours| hours.weekday_text)
            .unwrap_or_default(),
        website_url: result.url,
        phone: result.formatted_phone_number,
        reviews: result
            .reviews
            .into_iter()
            .map(|review| PlaceReview {
                text: review.text,
                author_name: review.author_name,
                relative_time: review.relative_time_description,
            })
            .collect(),
        location: result
            .geometry
            .map(|g| LatLng::new(g.location.lat, g.location.lng)),
    }
}
