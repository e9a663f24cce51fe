//! An in-memory map provider.
//!
//! [`HeadlessSurface`] keeps the viewport, the rendered items and the popup
//! so callers can inspect what a real surface would show.

use std::future::Future;

use shrinemap_core::{LatLng, LatLngBounds};

use crate::cluster::{world_pixel, MapItem};
use crate::error::SurfaceLoadError;
use crate::surface::{MapProvider, MapSurface, Popup, SurfaceConfig};

/// Highest zoom a fit may choose; a single point would otherwise zoom forever.
const MAX_FIT_ZOOM: u8 = 18;

#[derive(Debug, Clone)]
pub struct HeadlessProvider {
    width_px: u32,
    height_px: u32,
    failure: Option<String>,
}

impl Default for HeadlessProvider {
    fn default() -> Self {
        Self {
            width_px: 1024,
            height_px: 768,
            failure: None,
        }
    }
}

impl HeadlessProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose every `create_surface` fails with `reason`.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_viewport(mut self, width_px: u32, height_px: u32) -> Self {
        self.width_px = width_px;
        self.height_px = height_px;
        self
    }
}

impl MapProvider for HeadlessProvider {
    type Surface = HeadlessSurface;

    fn create_surface(
        &self,
        config: &SurfaceConfig,
    ) -> impl Future<Output = Result<HeadlessSurface, SurfaceLoadError>> + Send {
        let result = match &self.failure {
            Some(reason) => Err(SurfaceLoadError::new(reason.clone())),
            None => Ok(HeadlessSurface {
                config: config.clone(),
                center: config.center,
                zoom: config.zoom,
                width_px: self.width_px,
                height_px: self.height_px,
                fits: Vec::new(),
                items: Vec::new(),
                popup: None,
            }),
        };
        std::future::ready(result)
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    config: SurfaceConfig,
    center: LatLng,
    zoom: u8,
    width_px: u32,
    height_px: u32,
    fits: Vec<LatLngBounds>,
    items: Vec<MapItem>,
    popup: Option<Popup>,
}

impl HeadlessSurface {
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    #[must_use]
    pub fn center(&self) -> LatLng {
        self.center
    }

    /// Every bounds passed to `fit_bounds`, oldest first.
    #[must_use]
    pub fn fits(&self) -> &[LatLngBounds] {
        &self.fits
    }

    #[must_use]
    pub fn items(&self) -> &[MapItem] {
        &self.items
    }

    #[must_use]
    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    /// Largest zoom at which `bounds` fits inside the viewport.
    fn zoom_for(&self, bounds: &LatLngBounds) -> u8 {
        let nw = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
        let se = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);
        (0..=MAX_FIT_ZOOM)
            .rev()
            .find(|&zoom| {
                let (x0, y0) = world_pixel(nw, zoom);
                let (x1, y1) = world_pixel(se, zoom);
                x1 - x0 <= f64::from(self.width_px) && y1 - y0 <= f64::from(self.height_px)
            })
            .unwrap_or(0)
    }
}

impl MapSurface for HeadlessSurface {
    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.center = bounds.center();
        self.zoom = self.zoom_for(&bounds);
        self.fits.push(bounds);
    }

    fn render(&mut self, items: Vec<MapItem>) {
        self.items = items;
    }

    fn open_popup(&mut self, popup: Popup) {
        self.popup = Some(popup);
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }
}
