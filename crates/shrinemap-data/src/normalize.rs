//! Normalization from raw GeoJSON features to [`DisplayRecord`]s.
//!
//! The center of a `Polygon` or `MultiPolygon` is the unweighted mean of the
//! outer ring's vertices, not the area-weighted centroid. For concave or
//! irregular grounds the result can fall outside the shape itself; that is an
//! accepted approximation for placing a marker. Only the first polygon of a
//! `MultiPolygon` is considered.

use serde_json::Value;
use shrinemap_core::{LatLng, RegionBounds};

use crate::error::ExclusionReason;
use crate::types::{DisplayRecord, RawFeature};

/// Normalizes a batch of features, dropping every feature that fails a check.
///
/// Output order follows input order. Each record's id is derived from the
/// feature's index in `features`, so ids are unique within one call.
#[must_use]
pub fn normalize(features: &[RawFeature], region: &RegionBounds) -> Vec<DisplayRecord> {
    let records: Vec<DisplayRecord> = features
        .iter()
        .enumerate()
        .filter_map(
            |(index, feature)| match normalize_feature(index, feature, region) {
                Ok(record) => Some(record),
                Err(reason) => {
                    tracing::debug!(index, %reason, "excluded feature");
                    None
                }
            },
        )
        .collect();

    tracing::debug!(
        total = features.len(),
        kept = records.len(),
        "normalized features"
    );
    records
}

/// Normalizes one feature found at position `index` of its collection.
///
/// # Errors
///
/// Returns the first [`ExclusionReason`] the feature hits, checked in order:
/// name, geometry presence, center computation, center usability, region.
pub fn normalize_feature(
    index: usize,
    feature: &RawFeature,
    region: &RegionBounds,
) -> Result<DisplayRecord, ExclusionReason> {
    if feature.name().is_none() {
        return Err(ExclusionReason::MissingName);
    }

    let geometry = feature
        .geometry
        .as_ref()
        .filter(|g| g.get("coordinates").is_some_and(|c| !c.is_null()))
        .ok_or(ExclusionReason::MissingGeometry)?;

    let center = compute_center(geometry)?;

    if !center.is_usable() {
        return Err(ExclusionReason::UnusableCenter(center));
    }
    if !region.contains(center) {
        return Err(ExclusionReason::OutsideRegion(center));
    }

    Ok(DisplayRecord {
        id: format!("shrine-{index}"),
        center,
        source: feature.clone(),
    })
}

/// Computes the marker position for a GeoJSON geometry object.
///
/// # Errors
///
/// - [`ExclusionReason::UnsupportedGeometry`] for anything other than
///   `Point`, `Polygon` or `MultiPolygon`.
/// - [`ExclusionReason::MalformedCoordinates`] when the coordinate nesting
///   does not match the geometry type.
pub fn compute_center(geometry: &Value) -> Result<LatLng, ExclusionReason> {
    let kind = geometry.get("type").and_then(Value::as_str).unwrap_or_default();
    let coordinates = geometry
        .get("coordinates")
        .ok_or(ExclusionReason::MissingGeometry)?;

    match kind {
        "Point" => position(coordinates),
        "Polygon" => {
            let ring = coordinates
                .get(0)
                .ok_or(ExclusionReason::MalformedCoordinates("polygon has no rings"))?;
            ring_mean(ring)
        }
        "MultiPolygon" => {
            let ring = coordinates
                .get(0)
                .and_then(|polygon| polygon.get(0))
                .ok_or(ExclusionReason::MalformedCoordinates(
                    "multipolygon has no outer ring",
                ))?;
            ring_mean(ring)
        }
        other => Err(ExclusionReason::UnsupportedGeometry(other.to_string())),
    }
}

/// Reads a GeoJSON `[lng, lat, ...]` position as `(lat, lng)`.
fn position(value: &Value) -> Result<LatLng, ExclusionReason> {
    let lng = value.get(0).and_then(Value::as_f64);
    let lat = value.get(1).and_then(Value::as_f64);
    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(LatLng::new(lat, lng)),
        _ => Err(ExclusionReason::MalformedCoordinates(
            "position is not a [lng, lat] pair",
        )),
    }
}

/// Unweighted mean of every vertex in a ring, closing vertex included.
///
/// An empty ring yields NaN, which the usability check rejects.
fn ring_mean(ring: &Value) -> Result<LatLng, ExclusionReason> {
    let vertices = ring
        .as_array()
        .ok_or(ExclusionReason::MalformedCoordinates("ring is not an array"))?;

    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    for vertex in vertices {
        let point = position(vertex)?;
        sum_lat += point.lat;
        sum_lng += point.lng;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = vertices.len() as f64;
    Ok(LatLng::new(sum_lat / count, sum_lng / count))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
