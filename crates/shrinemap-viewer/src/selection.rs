//! Selection state and the staleness guard for enrichment results.
//!
//! Every selection change bumps a sequence number. A lookup is issued with a
//! [`LookupTicket`] carrying the number current at issue time, and its result
//! is applied only if that number is still current. Results therefore win by
//! issue order, never by completion order.

use shrinemap_data::DisplayRecord;
use shrinemap_places::PlaceDetails;

use crate::error::LookupError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Nothing,
    Selected(DisplayRecord),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EnrichmentResult {
    #[default]
    Idle,
    Loading,
    Ready(PlaceDetails),
    Failed(LookupError),
}

/// Identifies the selection a lookup was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    seq: u64,
    record_id: String,
}

impl LookupTicket {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn record_id(&self) -> &str {
        &self.record_id
    }
}

#[derive(Debug, Default)]
pub struct SelectionCoordinator {
    selection: SelectionState,
    enrichment: EnrichmentResult,
    seq: u64,
}

impl SelectionCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `record`, discarding any previous enrichment.
    ///
    /// Returns the ticket for the one lookup the caller must issue, or `None`
    /// when `provider_available` is false, in which case enrichment fails
    /// immediately with [`LookupError::ProviderUnavailable`].
    pub fn select(&mut self, record: DisplayRecord, provider_available: bool) -> Option<LookupTicket> {
        self.seq += 1;
        let ticket = LookupTicket {
            seq: self.seq,
            record_id: record.id.clone(),
        };
        tracing::debug!(record = %record.id, seq = self.seq, "selected");
        self.selection = SelectionState::Selected(record);

        if provider_available {
            self.enrichment = EnrichmentResult::Loading;
            Some(ticket)
        } else {
            self.enrichment = EnrichmentResult::Failed(LookupError::ProviderUnavailable);
            None
        }
    }

    /// Clears the selection. Any in-flight lookup becomes stale.
    pub fn deselect(&mut self) {
        self.seq += 1;
        self.selection = SelectionState::Nothing;
        self.enrichment = EnrichmentResult::Idle;
    }

    /// Applies a lookup outcome if `ticket` is still current.
    ///
    /// Returns whether the result was applied.
    pub fn apply(&mut self, ticket: &LookupTicket, result: Result<PlaceDetails, LookupError>) -> bool {
        if ticket.seq != self.seq {
            tracing::debug!(
                record = %ticket.record_id,
                seq = ticket.seq,
                current = self.seq,
                "discarding stale lookup result"
            );
            return false;
        }
        self.enrichment = match result {
            Ok(details) => EnrichmentResult::Ready(details),
            Err(error) => EnrichmentResult::Failed(error),
        };
        true
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    #[must_use]
    pub fn selected(&self) -> Option<&DisplayRecord> {
        match &self.selection {
            SelectionState::Selected(record) => Some(record),
            SelectionState::Nothing => None,
        }
    }

    #[must_use]
    pub fn enrichment(&self) -> &EnrichmentResult {
        &self.enrichment
    }
}
