//! Grid-based marker clustering.
//!
//! Positions are projected to Web Mercator world pixels at the current zoom.
//! Each marker, in input order, joins the nearest existing cluster whose
//! anchor lies within `grid_size_px` on both axes, or starts a new one.
//! Clusters smaller than `min_cluster_size` are dissolved back into plain
//! markers, so a lone marker never clusters. Above `max_zoom` every marker
//! is shown individually.

use std::f64::consts::PI;

use serde::Serialize;
use shrinemap_core::{ClusterSettings, LatLng, LatLngBounds};

const TILE_SIZE: f64 = 256.0;

/// One clickable marker, keyed by its record id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: String,
    pub position: LatLng,
    pub label: String,
}

/// A count glyph standing in for several nearby markers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    /// Mean of the member positions.
    pub position: LatLng,
    pub bounds: LatLngBounds,
    pub member_ids: Vec<String>,
}

impl Cluster {
    #[must_use]
    pub fn count(&self) -> usize {
        self.member_ids.len()
    }
}

/// What the surface draws: either a marker or a cluster glyph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapItem {
    Marker(Marker),
    Cluster(Cluster),
}

/// Projects a position to world pixel coordinates at `zoom`.
#[must_use]
pub fn world_pixel(position: LatLng, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * 2f64.powi(i32::from(zoom));
    let x = (position.lng + 180.0) / 360.0 * scale;
    let lat_rad = position.lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * scale;
    (x, y)
}

struct Pending<'a> {
    anchor: (f64, f64),
    members: Vec<&'a Marker>,
}

/// Groups `markers` for display at `zoom`.
///
/// Output order follows the first appearance of each item's earliest member.
#[must_use]
pub fn group(markers: &[Marker], zoom: u8, settings: &ClusterSettings) -> Vec<MapItem> {
    if zoom > settings.max_zoom {
        return markers.iter().cloned().map(MapItem::Marker).collect();
    }

    let grid = f64::from(settings.grid_size_px);
    let mut pending: Vec<Pending<'_>> = Vec::new();

    for marker in markers {
        let (x, y) = world_pixel(marker.position, zoom);
        let nearest = pending
            .iter_mut()
            .filter(|p| (p.anchor.0 - x).abs() <= grid && (p.anchor.1 - y).abs() <= grid)
            .min_by(|a, b| {
                let da = (a.anchor.0 - x).hypot(a.anchor.1 - y);
                let db = (b.anchor.0 - x).hypot(b.anchor.1 - y);
                da.total_cmp(&db)
            });
        match nearest {
            Some(p) => p.members.push(marker),
            None => pending.push(Pending {
                anchor: (x, y),
                members: vec![marker],
            }),
        }
    }

    let mut items = Vec::with_capacity(pending.len());
    for p in pending {
        if p.members.len() < settings.min_cluster_size.max(2) {
            items.extend(p.members.into_iter().cloned().map(MapItem::Marker));
        } else {
            items.push(MapItem::Cluster(into_cluster(&p.members)));
        }
    }
    items
}

#[allow(clippy::cast_precision_loss)]
fn into_cluster(members: &[&Marker]) -> Cluster {
    let n = members.len() as f64;
    let (lat_sum, lng_sum) = members.iter().fold((0.0, 0.0), |(lat, lng), m| {
        (lat + m.position.lat, lng + m.position.lng)
    });
    let mut bounds = LatLngBounds::from_point(members[0].position);
    for m in &members[1..] {
        bounds.extend(m.position);
    }
    Cluster {
        position: LatLng::new(lat_sum / n, lng_sum / n),
        bounds,
        member_ids: members.iter().map(|m| m.id.clone()).collect(),
    }
}
