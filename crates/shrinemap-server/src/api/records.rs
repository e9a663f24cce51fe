use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use shrinemap_core::LatLng;
use shrinemap_places::PlaceDetails;
use shrinemap_viewer::LookupError;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RecordItem {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub center: LatLng,
    pub address: Option<String>,
    pub geometry_type: Option<String>,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecordList {
    pub records: Vec<RecordItem>,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecordPlace {
    pub record_id: String,
    pub query: String,
    pub place: PlaceDetails,
}

pub(super) async fn list_records(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RecordList>> {
    let records = state
        .records
        .iter()
        .map(|r| RecordItem {
            id: r.id.clone(),
            name: r.name().to_owned(),
            name_en: r.english_name().map(ToOwned::to_owned),
            center: r.center,
            address: r.source.address(),
            geometry_type: r.source.geometry_type().map(ToOwned::to_owned),
            properties: r.source.properties.clone().unwrap_or_default(),
        })
        .collect();

    Json(ApiResponse {
        data: RecordList {
            records,
            notice: state.notice.as_deref().map(ToOwned::to_owned),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn get_record_place(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RecordPlace>>, ApiError> {
    let Some(record) = state.record(&id) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("record {id} not found"),
        ));
    };

    let place = state
        .enricher
        .lookup(record)
        .await
        .map_err(|e| map_lookup_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: RecordPlace {
            record_id: record.id.clone(),
            query: shrinemap_viewer::lookup_query(record),
            place,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_lookup_error(request_id: String, error: &LookupError) -> ApiError {
    let code = match error {
        LookupError::ProviderUnavailable => "provider_unavailable",
        LookupError::NotFound(_) => "place_not_found",
        LookupError::Timeout => "upstream_timeout",
        LookupError::DetailFetchFailed(_) | LookupError::Transport(_) => "upstream_error",
    };
    ApiError::new(request_id, code, error.to_string())
}
