//! End-to-end behavior of `ViewerSession` with the headless surface and a
//! scripted places provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use shrinemap_core::{ClusterSettings, LatLng, RegionBounds};
use shrinemap_data::{normalize, DataLoad, RawFeature};
use shrinemap_places::{PlaceCandidate, PlaceDetails, PlacesApi, PlacesError};
use shrinemap_viewer::{
    EnrichmentResult, HeadlessProvider, HeadlessSurface, LookupError, MapPresenter, SurfaceConfig,
    SurfaceState, ViewerEvent, ViewerSession,
};

/// Resolves a query to its first word; queries starting with "A" are slow.
#[derive(Default)]
struct ScriptedPlaces;

impl PlacesApi for ScriptedPlaces {
    fn find_place(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<PlaceCandidate, PlacesError>> + Send {
        let place_id = query.split_whitespace().next().unwrap_or_default().to_owned();
        let delay = if place_id.starts_with('A') {
            Duration::from_millis(150)
        } else {
            Duration::ZERO
        };
        async move {
            tokio::time::sleep(delay).await;
            Ok(PlaceCandidate {
                place_id,
                name: None,
            })
        }
    }

    fn place_details(
        &self,
        place_id: &str,
    ) -> impl Future<Output = Result<PlaceDetails, PlacesError>> + Send {
        std::future::ready(Ok(PlaceDetails {
            name: Some(format!("details for {place_id}")),
            ..PlaceDetails::default()
        }))
    }
}

type Session = ViewerSession<HeadlessSurface, ScriptedPlaces>;

fn data() -> DataLoad {
    let features: Vec<RawFeature> = [
        json!({
            "type": "Feature",
            "properties": { "name": "A-jinja", "name:en": "Shrine A" },
            "geometry": { "type": "Point", "coordinates": [139.6999, 35.6764] }
        }),
        json!({
            "type": "Feature",
            "properties": { "name": "B-jinja" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[135.0, 34.0], [136.0, 34.0], [136.0, 35.0], [135.0, 35.0]]]
            }
        }),
    ]
    .iter()
    .map(RawFeature::from_value)
    .collect();
    DataLoad {
        records: normalize(&features, &RegionBounds::japan()),
        notice: None,
    }
}

fn session(places: Option<ScriptedPlaces>) -> Session {
    let presenter = MapPresenter::new(SurfaceConfig::default(), ClusterSettings::default());
    ViewerSession::new(presenter, places, Duration::from_secs(5))
}

async fn ready_session(places: Option<ScriptedPlaces>) -> Session {
    let mut s = session(places);
    s.spawn_surface_load(Arc::new(HeadlessProvider::new()));
    assert!(s.process_next().await);
    s.handle(ViewerEvent::DataLoaded(data()));
    s
}

#[tokio::test]
async fn later_selection_wins_even_when_earlier_lookup_finishes_last() {
    let mut s = ready_session(Some(ScriptedPlaces::default())).await;
    assert!(s.enricher().is_available());

    s.handle(ViewerEvent::MarkerClicked("shrine-0".into()));
    s.handle(ViewerEvent::MarkerClicked("shrine-1".into()));
    assert_eq!(s.coordinator().enrichment(), &EnrichmentResult::Loading);

    // B finishes first and is applied; A arrives afterwards and is dropped.
    assert!(s.process_next().await);
    assert!(s.process_next().await);

    let panel = s.panel().expect("B is selected");
    assert_eq!(panel.title, "B-jinja");
    match &panel.enrichment {
        EnrichmentResult::Ready(details) => {
            assert_eq!(details.name.as_deref(), Some("details for B-jinja"));
        }
        other => panic!("expected B's details, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_surface_leaves_lookups_unavailable() {
    let mut s = session(Some(ScriptedPlaces::default()));
    s.spawn_surface_load(Arc::new(HeadlessProvider::failing("script load failed")));
    assert!(s.process_next().await);
    assert!(matches!(s.presenter().state(), SurfaceState::Failed(_)));

    s.handle(ViewerEvent::DataLoaded(data()));
    s.handle(ViewerEvent::PanelSelect("shrine-0".into()));

    assert_eq!(
        s.coordinator().enrichment(),
        &EnrichmentResult::Failed(LookupError::ProviderUnavailable)
    );
    assert!(!s.enricher().is_available());
}

#[tokio::test]
async fn missing_api_key_fails_selection_immediately() {
    let mut s = ready_session(None).await;
    s.handle(ViewerEvent::MarkerClicked("shrine-0".into()));

    let panel = s.panel().unwrap();
    assert_eq!(
        panel.enrichment,
        EnrichmentResult::Failed(LookupError::ProviderUnavailable)
    );
    assert_eq!(panel.subtitle.as_deref(), Some("Shrine A"));
}

#[tokio::test]
async fn popup_close_keeps_panel_open() {
    let mut s = ready_session(Some(ScriptedPlaces::default())).await;
    s.handle(ViewerEvent::MarkerClicked("shrine-1".into()));
    assert!(s.process_next().await);

    s.handle(ViewerEvent::PopupClosed);
    assert!(s.presenter().popup().is_none());
    let panel = s.panel().expect("selection survives popup close");
    assert!(matches!(panel.enrichment, EnrichmentResult::Ready(_)));

    s.handle(ViewerEvent::Deselect);
    assert!(s.panel().is_none());
    assert_eq!(s.coordinator().enrichment(), &EnrichmentResult::Idle);
}

#[tokio::test]
async fn deselect_discards_in_flight_lookup() {
    let mut s = ready_session(Some(ScriptedPlaces::default())).await;
    s.handle(ViewerEvent::MarkerClicked("shrine-0".into()));
    s.handle(ViewerEvent::Deselect);

    assert!(s.process_next().await);
    assert!(s.panel().is_none());
    assert_eq!(s.coordinator().enrichment(), &EnrichmentResult::Idle);
}

#[tokio::test]
async fn data_before_surface_still_fits_viewport() {
    let mut s = session(None);
    s.handle(ViewerEvent::DataLoaded(data()));
    s.spawn_surface_load(Arc::new(HeadlessProvider::new()));
    assert!(s.process_next().await);

    let surface = s.presenter().surface().unwrap();
    assert_eq!(surface.fits().len(), 1);
    assert!(surface.fits()[0].contains(LatLng::new(35.6764, 139.6999)));
    assert!(surface.fits()[0].contains(LatLng::new(34.5, 135.5)));
}

#[tokio::test]
async fn unreadable_data_source_yields_notice_and_no_fit() {
    let mut s = session(None);
    s.spawn_surface_load(Arc::new(HeadlessProvider::new()));
    assert!(s.process_next().await);

    let client = reqwest::Client::new();
    s.spawn_data_load(
        client,
        "/nonexistent/export.geojson".to_string(),
        RegionBounds::japan(),
    );
    assert!(s.process_next().await);

    assert!(s.presenter().data_notice().is_some());
    assert_eq!(s.presenter().records().count(), 0);
    assert!(s.presenter().surface().unwrap().fits().is_empty());
}

#[tokio::test]
async fn run_stops_on_unload() {
    let mut s = ready_session(None).await;
    let tx = s.sender();
    tx.send(ViewerEvent::ZoomChanged(16)).unwrap();
    tx.send(ViewerEvent::Unload).unwrap();

    s.run().await;
    assert_eq!(s.presenter().state(), &SurfaceState::Unloaded);
}
