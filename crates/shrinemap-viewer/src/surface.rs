//! Capability traits for the map provider.
//!
//! The presenter only talks to these traits. [`crate::headless`] supplies an
//! in-memory implementation.

use std::future::Future;

use serde::Serialize;
use shrinemap_core::{LatLng, LatLngBounds, ViewDefaults};

use crate::cluster::MapItem;
use crate::error::SurfaceLoadError;

/// Options handed to the provider when the surface is created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceConfig {
    pub center: LatLng,
    pub zoom: u8,
    /// Label language, e.g. `ja`.
    pub language: String,
    /// Region bias for labels and borders, e.g. `JP`.
    pub region_code: String,
}

impl From<&ViewDefaults> for SurfaceConfig {
    fn from(view: &ViewDefaults) -> Self {
        Self {
            center: view.center,
            zoom: view.zoom,
            language: view.language.clone(),
            region_code: view.region_code.clone(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::from(&ViewDefaults::default())
    }
}

/// The single info popup anchored at a record's centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub record_id: String,
    pub position: LatLng,
    pub title: String,
    /// `name:en`, when the feature has one.
    pub subtitle: Option<String>,
}

/// A live map surface.
pub trait MapSurface: Send + 'static {
    fn zoom(&self) -> u8;

    fn set_zoom(&mut self, zoom: u8);

    /// Moves the viewport so that `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Replaces everything drawn with `items`.
    fn render(&mut self, items: Vec<MapItem>);

    fn open_popup(&mut self, popup: Popup);

    fn close_popup(&mut self);
}

/// Creates map surfaces.
pub trait MapProvider: Send + Sync + 'static {
    type Surface: MapSurface;

    /// # Errors
    ///
    /// Returns [`SurfaceLoadError`] if the provider cannot be loaded.
    fn create_surface(
        &self,
        config: &SurfaceConfig,
    ) -> impl Future<Output = Result<Self::Surface, SurfaceLoadError>> + Send;
}
