pub mod cluster;
pub mod enrich;
pub mod error;
pub mod headless;
pub mod panel;
pub mod presenter;
pub mod selection;
pub mod session;
pub mod surface;

#[cfg(test)]
mod fake_places;

pub use cluster::{group, Cluster, MapItem, Marker};
pub use enrich::{lookup_query, PlaceEnricher, DEFAULT_LOOKUP_TIMEOUT};
pub use error::{LookupError, SurfaceLoadError};
pub use headless::{HeadlessProvider, HeadlessSurface};
pub use panel::DetailPanel;
pub use presenter::{MapPresenter, SurfaceState};
pub use selection::{EnrichmentResult, LookupTicket, SelectionCoordinator, SelectionState};
pub use session::{ViewerEvent, ViewerSession};
pub use surface::{MapProvider, MapSurface, Popup, SurfaceConfig};
