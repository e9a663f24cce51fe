//! The side detail panel for the selected record.

use std::fmt;

use shrinemap_data::DisplayRecord;

use crate::selection::EnrichmentResult;

/// What the detail panel shows for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailPanel {
    pub record_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Six decimal places.
    pub latitude: String,
    pub longitude: String,
    pub enrichment: EnrichmentResult,
}

impl DetailPanel {
    #[must_use]
    pub fn new(record: &DisplayRecord, enrichment: &EnrichmentResult) -> Self {
        Self {
            record_id: record.id.clone(),
            title: record.name().to_owned(),
            subtitle: record.english_name().map(ToOwned::to_owned),
            latitude: format!("{:.6}", record.center.lat),
            longitude: format!("{:.6}", record.center.lng),
            enrichment: enrichment.clone(),
        }
    }
}

impl fmt::Display for DetailPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "{subtitle}")?;
        }
        writeln!(f, "Latitude: {}", self.latitude)?;
        writeln!(f, "Longitude: {}", self.longitude)?;

        match &self.enrichment {
            EnrichmentResult::Idle => Ok(()),
            EnrichmentResult::Loading => writeln!(f, "Loading place details..."),
            EnrichmentResult::Failed(error) => writeln!(f, "Error: {error}"),
            EnrichmentResult::Ready(details) => {
                if let Some(address) = &details.address {
                    writeln!(f, "Address: {address}")?;
                }
                if let Some(rating) = details.rating {
                    match details.rating_count {
                        Some(count) => writeln!(f, "Rating: {rating:.1} ({count} reviews)")?,
                        None => writeln!(f, "Rating: {rating:.1}")?,
                    }
                }
                if !details.opening_hours_text.is_empty() {
                    writeln!(f, "Hours:")?;
                    for line in &details.opening_hours_text {
                        writeln!(f, "  {line}")?;
                    }
                }
                if let Some(phone) = &details.phone {
                    writeln!(f, "Phone: {phone}")?;
                }
                if let Some(url) = &details.website_url {
                    writeln!(f, "Website: {url}")?;
                }
                if !details.photo_refs.is_empty() {
                    writeln!(f, "Photos: {}", details.photo_refs.len())?;
                }
                for review in &details.reviews {
                    writeln!(
                        f,
                        "- {} ({}): {}",
                        review.author_name, review.relative_time, review.text
                    )?;
                }
                Ok(())
            }
        }
    }
}
