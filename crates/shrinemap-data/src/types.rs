//! GeoJSON input types and the display record derived from them.
//!
//! ## Observed shape of the shrine export
//!
//! The data file is an Overpass/OSM export: a `FeatureCollection` whose
//! features carry OSM tags as string-valued `properties` (`name`, `name:en`,
//! `addr:*`, `religion`, ...). Shrines mapped as a single node arrive as
//! `Point`; shrine grounds arrive as `Polygon` or `MultiPolygon`.
//!
//! Features are converted leniently: a feature that is not an object, or has
//! `null` properties, still occupies its slot so that record ids stay tied
//! to the feature's position in the file. Such features are then rejected by
//! the normalizer for lacking a name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shrinemap_core::LatLng;

use crate::error::DataFetchError;

/// OSM address tags, most general first. Japanese addresses are written
/// without separators between components.
const ADDRESS_TAGS: &[&str] = &[
    "addr:province",
    "addr:city",
    "addr:suburb",
    "addr:quarter",
    "addr:neighbourhood",
    "addr:block_number",
    "addr:housenumber",
];

/// A single GeoJSON feature as read from the data file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeature {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,

    /// Kept as raw JSON so that a malformed shape only rejects this feature.
    #[serde(default)]
    pub geometry: Option<Value>,
}

impl RawFeature {
    /// Converts any JSON value into a feature without failing.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            kind: value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            properties: value.get("properties").and_then(Value::as_object).cloned(),
            geometry: value.get("geometry").filter(|g| !g.is_null()).cloned(),
        }
    }

    /// A non-empty string property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .as_ref()?
            .get(key)?
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The `name` property as written. Only an absent or `""` name is
    /// missing; whitespace is kept.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.properties
            .as_ref()?
            .get("name")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn english_name(&self) -> Option<&str> {
        self.property("name:en")
    }

    /// The explicit `address` property, or one assembled from `addr:*` tags.
    #[must_use]
    pub fn address(&self) -> Option<String> {
        if let Some(address) = self.property("address") {
            return Some(address.to_string());
        }
        let assembled: String = ADDRESS_TAGS
            .iter()
            .filter_map(|tag| self.property(tag))
            .collect();
        (!assembled.is_empty()).then_some(assembled)
    }

    /// The `type` member of the geometry, if any.
    #[must_use]
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry.as_ref()?.get("type")?.as_str()
    }
}

/// A feature that passed normalization, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    /// `shrine-{index}` where index is the feature's position in the file.
    pub id: String,
    pub center: LatLng,
    pub source: RawFeature,
}

impl DisplayRecord {
    /// The popup/panel title. Normalization guarantees it is present.
    #[must_use]
    pub fn name(&self) -> &str {
        self.source.name().unwrap_or_default()
    }

    #[must_use]
    pub fn english_name(&self) -> Option<&str> {
        self.source.english_name()
    }
}

/// Parses a GeoJSON document and returns its features in file order.
///
/// `context` names the source in error messages.
///
/// # Errors
///
/// - [`DataFetchError::Deserialize`] if the text is not JSON.
/// - [`DataFetchError::NotFeatureCollection`] if the top level is not a
///   FeatureCollection with a `features` array.
pub fn parse_feature_collection(text: &str, context: &str) -> Result<Vec<RawFeature>, DataFetchError> {
    let value: Value = serde_json::from_str(text).map_err(|e| DataFetchError::Deserialize {
        context: context.to_string(),
        source: e,
    })?;

    let type_ok = match value.get("type").and_then(Value::as_str) {
        Some(kind) => kind == "FeatureCollection",
        None => value.get("type").is_none(),
    };
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .filter(|_| type_ok)
        .ok_or_else(|| DataFetchError::NotFeatureCollection {
            context: context.to_string(),
        })?;

    Ok(features.iter().map(RawFeature::from_value).collect())
}
