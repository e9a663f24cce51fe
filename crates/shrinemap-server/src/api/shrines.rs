use axum::Json;
use serde_json::Value;

/// `GET /api/shrines`: the hardcoded sample collection.
pub(super) async fn placeholder_shrines() -> Json<Value> {
    Json(shrinemap_data::placeholder_collection())
}
