mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use shrinemap_places::PlacesClient;
use shrinemap_viewer::PlaceEnricher;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = shrinemap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let client = shrinemap_data::build_client(config.request_timeout_secs, "shrinemap-server/0.1")?;
    let load = shrinemap_data::load_records(&client, &config.data_source, &config.region).await;

    let mut enricher = PlaceEnricher::new(Duration::from_secs(config.lookup_timeout_secs));
    match PlacesClient::from_config(&config)? {
        Some(places) => enricher.attach(Arc::new(places)),
        None => tracing::warn!("SHRINEMAP_PLACES_API_KEY not set; place lookups are disabled"),
    }

    let app = build_app(AppState::new(load, enricher));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
