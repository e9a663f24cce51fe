//! Command handlers for the CLI.
//!
//! Every handler loads the configured data source the same way the server
//! does; a load failure prints the notice and continues with no records.

use std::sync::Arc;
use std::time::Duration;

use shrinemap_core::AppConfig;
use shrinemap_data::{build_client, load_records, placeholder_collection, DataLoad};
use shrinemap_places::PlacesClient;
use shrinemap_viewer::{
    DetailPanel, HeadlessProvider, MapItem, MapPresenter, MapSurface, PlaceEnricher,
    SelectionCoordinator, SurfaceConfig, SurfaceState,
};

const USER_AGENT: &str = "shrinemap-cli/0.1";

async fn load(config: &AppConfig) -> anyhow::Result<DataLoad> {
    let client = build_client(config.request_timeout_secs, USER_AGENT)?;
    let load = load_records(&client, &config.data_source, &config.region).await;
    if let Some(notice) = &load.notice {
        eprintln!("warning: {notice}");
    }
    Ok(load)
}

pub(crate) async fn run_normalize(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let load = load(config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&load.records)?);
        return Ok(());
    }

    println!("{} records from {}", load.records.len(), config.data_source);
    for record in &load.records {
        println!(
            "{:<12} {:.6},{:.6}  {}",
            record.id,
            record.center.lat,
            record.center.lng,
            record.name()
        );
    }
    Ok(())
}

pub(crate) async fn run_clusters(config: &AppConfig, zoom: Option<u8>) -> anyhow::Result<()> {
    let load = load(config).await?;

    let mut presenter = MapPresenter::new(SurfaceConfig::from(&config.view), config.cluster);
    if let SurfaceState::Failed(error) = presenter.initialize(&HeadlessProvider::new()).await {
        anyhow::bail!("{error}");
    }
    presenter.on_data_ready(load);
    if let Some(zoom) = zoom {
        presenter.on_zoom_changed(zoom);
    }

    let Some(surface) = presenter.surface() else {
        anyhow::bail!("map surface is not available");
    };
    println!(
        "viewport center {} zoom {}",
        surface.center(),
        surface.zoom()
    );
    print!("{}", format_items(surface.items()));
    Ok(())
}

fn format_items(items: &[MapItem]) -> String {
    let mut out = String::new();
    for item in items {
        let line = match item {
            MapItem::Marker(marker) => format!(
                "marker   {:<12} {}  {}\n",
                marker.id, marker.position, marker.label
            ),
            MapItem::Cluster(cluster) => format!(
                "cluster  {:<12} {}  [{}]\n",
                cluster.count(),
                cluster.position,
                cluster.member_ids.join(", ")
            ),
        };
        out.push_str(&line);
    }
    out
}

pub(crate) async fn run_lookup(config: &AppConfig, record_id: &str) -> anyhow::Result<()> {
    let load = load(config).await?;
    let Some(record) = load.records.into_iter().find(|r| r.id == record_id) else {
        anyhow::bail!("no record with id {record_id}");
    };

    let mut enricher = PlaceEnricher::new(Duration::from_secs(config.lookup_timeout_secs));
    if let Some(places) = PlacesClient::from_config(config)? {
        enricher.attach(Arc::new(places));
    }

    let mut coordinator = SelectionCoordinator::new();
    if let Some(ticket) = coordinator.select(record.clone(), enricher.is_available()) {
        let result = enricher.lookup(&record).await;
        coordinator.apply(&ticket, result);
    }

    print!("{}", DetailPanel::new(&record, coordinator.enrichment()));
    Ok(())
}

pub(crate) fn run_sample() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&placeholder_collection())?);
    Ok(())
}
