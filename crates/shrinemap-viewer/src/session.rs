//! The viewer event loop.
//!
//! All state lives on the loop. Surface creation, data loading and place
//! lookups run in spawned tasks that post a [`ViewerEvent`] back when they
//! finish. Lookups carry a [`LookupTicket`] so that completions for a
//! superseded selection are dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use shrinemap_core::RegionBounds;
use shrinemap_data::{load_records, DataLoad, DisplayRecord};
use shrinemap_places::{PlaceDetails, PlacesApi};
use tokio::sync::mpsc;

use crate::enrich::PlaceEnricher;
use crate::error::{LookupError, SurfaceLoadError};
use crate::panel::DetailPanel;
use crate::presenter::{MapPresenter, SurfaceState};
use crate::selection::{LookupTicket, SelectionCoordinator};
use crate::surface::{MapProvider, MapSurface};

#[derive(Debug)]
pub enum ViewerEvent<S> {
    SurfaceLoaded(Result<S, SurfaceLoadError>),
    DataLoaded(DataLoad),
    MarkerClicked(String),
    PopupClosed,
    /// A record chosen from the detail panel rather than the map.
    PanelSelect(String),
    Deselect,
    ZoomChanged(u8),
    LookupFinished(LookupTicket, Result<PlaceDetails, LookupError>),
    /// Tears the session down and stops [`ViewerSession::run`].
    Unload,
}

pub struct ViewerSession<S, P> {
    presenter: MapPresenter<S>,
    coordinator: SelectionCoordinator,
    enricher: PlaceEnricher<P>,
    /// Attached to the enricher once the surface is ready.
    pending_places: Option<Arc<P>>,
    tx: mpsc::UnboundedSender<ViewerEvent<S>>,
    rx: mpsc::UnboundedReceiver<ViewerEvent<S>>,
}

impl<S: MapSurface, P: PlacesApi> ViewerSession<S, P> {
    /// `places` is `None` when no API key is configured; every lookup then
    /// fails with [`LookupError::ProviderUnavailable`].
    #[must_use]
    pub fn new(presenter: MapPresenter<S>, places: Option<P>, lookup_timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            presenter,
            coordinator: SelectionCoordinator::new(),
            enricher: PlaceEnricher::new(lookup_timeout),
            pending_places: places.map(Arc::new),
            tx,
            rx,
        }
    }

    /// A handle for posting events from outside the loop.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<ViewerEvent<S>> {
        self.tx.clone()
    }

    /// Creates the surface in the background.
    pub fn spawn_surface_load<M>(&self, provider: Arc<M>)
    where
        M: MapProvider<Surface = S>,
    {
        let tx = self.tx.clone();
        let config = self.presenter.config().clone();
        tokio::spawn(async move {
            let result = provider.create_surface(&config).await;
            post(&tx, ViewerEvent::SurfaceLoaded(result));
        });
    }

    /// Loads and normalizes `source` in the background.
    pub fn spawn_data_load(&self, client: reqwest::Client, source: String, region: RegionBounds) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let load = load_records(&client, &source, &region).await;
            post(&tx, ViewerEvent::DataLoaded(load));
        });
    }

    /// Processes events until [`ViewerEvent::Unload`].
    pub async fn run(&mut self) {
        while self.process_next().await {}
    }

    /// Waits for one event and handles it. Returns `false` once unloaded.
    pub async fn process_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => self.handle(event),
            None => false,
        }
    }

    /// Applies one event. Must be called inside a tokio runtime, because a
    /// selection spawns its lookup.
    pub fn handle(&mut self, event: ViewerEvent<S>) -> bool {
        match event {
            ViewerEvent::SurfaceLoaded(result) => {
                self.presenter.on_surface_loaded(result);
                if *self.presenter.state() == SurfaceState::Ready {
                    if let Some(places) = self.pending_places.take() {
                        self.enricher.attach(places);
                    }
                }
            }
            ViewerEvent::DataLoaded(load) => self.presenter.on_data_ready(load),
            ViewerEvent::MarkerClicked(id) => {
                if let Some(record) = self.presenter.on_marker_click(&id) {
                    self.select(record);
                }
            }
            ViewerEvent::PopupClosed => self.presenter.on_popup_close(),
            ViewerEvent::PanelSelect(id) => {
                if let Some(record) = self.presenter.record(&id).cloned() {
                    self.select(record);
                }
            }
            ViewerEvent::Deselect => self.coordinator.deselect(),
            ViewerEvent::ZoomChanged(zoom) => self.presenter.on_zoom_changed(zoom),
            ViewerEvent::LookupFinished(ticket, result) => {
                self.coordinator.apply(&ticket, result);
            }
            ViewerEvent::Unload => {
                self.coordinator.deselect();
                self.presenter.unload();
                return false;
            }
        }
        true
    }

    fn select(&mut self, record: DisplayRecord) {
        let Some(ticket) = self
            .coordinator
            .select(record.clone(), self.enricher.is_available())
        else {
            return;
        };
        let enricher = self.enricher.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = enricher.lookup(&record).await;
            post(&tx, ViewerEvent::LookupFinished(ticket, result));
        });
    }

    #[must_use]
    pub fn presenter(&self) -> &MapPresenter<S> {
        &self.presenter
    }

    #[must_use]
    pub fn coordinator(&self) -> &SelectionCoordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn enricher(&self) -> &PlaceEnricher<P> {
        &self.enricher
    }

    /// The detail panel for the current selection, if any.
    #[must_use]
    pub fn panel(&self) -> Option<DetailPanel> {
        self.coordinator
            .selected()
            .map(|record| DetailPanel::new(record, self.coordinator.enrichment()))
    }
}

fn post<S>(tx: &mpsc::UnboundedSender<ViewerEvent<S>>, event: ViewerEvent<S>) {
    if tx.send(event).is_err() {
        tracing::debug!("viewer session closed before task finished");
    }
}
