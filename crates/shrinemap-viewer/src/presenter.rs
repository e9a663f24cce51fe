//! Map lifecycle, marker rendering and the single active popup.
//!
//! The presenter owns the surface and a per-session marker table. The
//! viewport is fitted to the data once, after both the surface and the data
//! have arrived, and only when there is at least one record.

use std::collections::HashMap;

use shrinemap_core::{ClusterSettings, LatLngBounds};
use shrinemap_data::{DataLoad, DisplayRecord};

use crate::cluster::{self, Marker};
use crate::error::SurfaceLoadError;
use crate::surface::{MapProvider, MapSurface, Popup, SurfaceConfig};

/// Lifecycle of the map surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState {
    Loading,
    Ready,
    /// Terminal. There is no retry.
    Failed(SurfaceLoadError),
    Unloaded,
}

pub struct MapPresenter<S> {
    config: SurfaceConfig,
    cluster: ClusterSettings,
    state: SurfaceState,
    surface: Option<S>,
    /// Record ids in ingestion order.
    order: Vec<String>,
    markers: HashMap<String, DisplayRecord>,
    data_ready: bool,
    data_notice: Option<String>,
    fitted: bool,
    popup: Option<Popup>,
}

impl<S: MapSurface> MapPresenter<S> {
    #[must_use]
    pub fn new(config: SurfaceConfig, cluster: ClusterSettings) -> Self {
        Self {
            config,
            cluster,
            state: SurfaceState::Loading,
            surface: None,
            order: Vec::new(),
            markers: HashMap::new(),
            data_ready: false,
            data_notice: None,
            fitted: false,
            popup: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Acquires a surface from `provider` and records the outcome.
    pub async fn initialize<P>(&mut self, provider: &P) -> &SurfaceState
    where
        P: MapProvider<Surface = S>,
    {
        let result = provider.create_surface(&self.config).await;
        self.on_surface_loaded(result);
        &self.state
    }

    /// Records the outcome of a surface load started elsewhere.
    ///
    /// Ignored unless the presenter is still waiting for its surface.
    pub fn on_surface_loaded(&mut self, result: Result<S, SurfaceLoadError>) {
        if self.state != SurfaceState::Loading {
            tracing::debug!(state = ?self.state, "ignoring late surface load");
            return;
        }
        match result {
            Ok(surface) => {
                tracing::info!(center = %self.config.center, zoom = self.config.zoom, "map surface ready");
                self.surface = Some(surface);
                self.state = SurfaceState::Ready;
                self.render();
                self.fit_if_ready();
                if let (Some(surface), Some(popup)) = (self.surface.as_mut(), self.popup.clone()) {
                    surface.open_popup(popup);
                }
            }
            Err(error) => {
                tracing::error!(error = %error, "map surface failed to load");
                self.state = SurfaceState::Failed(error);
            }
        }
    }

    /// Installs the normalized records and, when possible, fits the viewport.
    pub fn on_data_ready(&mut self, load: DataLoad) {
        self.data_notice = load.notice.map(|e| e.to_string());
        self.order = load.records.iter().map(|r| r.id.clone()).collect();
        self.markers = load
            .records
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        self.data_ready = true;
        self.fitted = false;
        tracing::debug!(records = self.order.len(), "records installed");
        self.render();
        self.fit_if_ready();
    }

    /// Opens the popup for `record_id` and returns the record for selection.
    ///
    /// Unknown ids are ignored.
    pub fn on_marker_click(&mut self, record_id: &str) -> Option<DisplayRecord> {
        let record = self.markers.get(record_id)?.clone();
        let popup = Popup {
            record_id: record.id.clone(),
            position: record.center,
            title: record.name().to_owned(),
            subtitle: record.english_name().map(ToOwned::to_owned),
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.open_popup(popup.clone());
        }
        self.popup = Some(popup);
        Some(record)
    }

    /// Closes the popup. The selection and detail panel are left alone.
    pub fn on_popup_close(&mut self) {
        self.popup = None;
        if let Some(surface) = self.surface.as_mut() {
            surface.close_popup();
        }
    }

    /// Re-clusters for a new zoom level.
    pub fn on_zoom_changed(&mut self, zoom: u8) {
        if let Some(surface) = self.surface.as_mut() {
            surface.set_zoom(zoom);
        }
        self.render();
    }

    /// Drops the surface and the marker table.
    pub fn unload(&mut self) {
        self.surface = None;
        self.order.clear();
        self.markers.clear();
        self.popup = None;
        self.data_ready = false;
        self.fitted = false;
        self.state = SurfaceState::Unloaded;
    }

    #[must_use]
    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    #[must_use]
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// The data-load failure, if the data source could not be read.
    #[must_use]
    pub fn data_notice(&self) -> Option<&str> {
        self.data_notice.as_deref()
    }

    #[must_use]
    pub fn record(&self, id: &str) -> Option<&DisplayRecord> {
        self.markers.get(id)
    }

    /// Records in ingestion order.
    pub fn records(&self) -> impl Iterator<Item = &DisplayRecord> {
        self.order.iter().filter_map(|id| self.markers.get(id))
    }

    fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let markers: Vec<Marker> = self
            .order
            .iter()
            .filter_map(|id| self.markers.get(id))
            .map(|r| Marker {
                id: r.id.clone(),
                position: r.center,
                label: r.name().to_owned(),
            })
            .collect();
        let items = cluster::group(&markers, surface.zoom(), &self.cluster);
        surface.render(items);
    }

    fn fit_if_ready(&mut self) {
        if self.fitted || !self.data_ready {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let centers = self
            .order
            .iter()
            .filter_map(|id| self.markers.get(id))
            .map(|r| r.center);
        let Some(bounds) = LatLngBounds::from_points(centers) else {
            return;
        };
        surface.fit_bounds(bounds);
        self.fitted = true;
        // The fit changes the zoom, so the clusters are stale.
        self.render();
    }
}

#[cfg(test)]
#[path = "presenter_test.rs"]
mod tests;
