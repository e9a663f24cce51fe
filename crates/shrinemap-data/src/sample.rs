//! The hardcoded sample collection served by the placeholder endpoint.
//!
//! Not part of the real data path; the viewer always reads the configured
//! data source.

use serde_json::{json, Value};

/// A FeatureCollection holding a single shrine.
#[must_use]
pub fn placeholder_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "id": "1",
                    "name": "明治神宮",
                    "address": "東京都渋谷区代々木神園町1-1",
                    "type": "神社",
                    "founded": "1920"
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [139.6999, 35.6764]
                }
            }
        ]
    })
}
