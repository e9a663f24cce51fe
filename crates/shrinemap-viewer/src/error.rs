use thiserror::Error;

/// The map provider could not produce a surface. Terminal for the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("map surface failed to load: {reason}")]
pub struct SurfaceLoadError {
    pub reason: String,
}

impl SurfaceLoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Why enrichment for the selected record failed.
///
/// Scoped to one selection; never affects map rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No places client is attached, because the map surface is not live.
    #[error("place lookup is unavailable until the map has loaded")]
    ProviderUnavailable,

    /// The resolve step matched nothing or reported a non-OK status.
    #[error("no matching place ({0})")]
    NotFound(String),

    /// The detail step reported a non-OK status.
    #[error("place details could not be fetched ({0})")]
    DetailFetchFailed(String),

    #[error("place lookup timed out")]
    Timeout,

    /// Network or decoding failure with no provider status attached.
    #[error("place lookup failed: {0}")]
    Transport(String),
}
