//! Loading the FeatureCollection from disk or over HTTP.
//!
//! [`load_records`] is fail-soft: any failure yields an empty record set plus
//! the error as a notice for the caller to display. There is no retry.

use std::path::Path;
use std::time::Duration;

use shrinemap_core::RegionBounds;

use crate::error::DataFetchError;
use crate::normalize::normalize;
use crate::types::{parse_feature_collection, DisplayRecord, RawFeature};

/// Outcome of loading and normalizing the data source.
#[derive(Debug, Default)]
pub struct DataLoad {
    pub records: Vec<DisplayRecord>,
    /// Set when the source could not be read; `records` is then empty.
    pub notice: Option<DataFetchError>,
}

/// Builds the HTTP client used for data fetches.
///
/// # Errors
///
/// Returns [`DataFetchError::Http`] if the client cannot be constructed.
pub fn build_client(timeout_secs: u64, user_agent: &str) -> Result<reqwest::Client, DataFetchError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Reads raw features from `source`, a filesystem path or `http(s)://` URL.
///
/// # Errors
///
/// - [`DataFetchError::Http`] / [`DataFetchError::UnexpectedStatus`] for
///   network failures and non-2xx responses.
/// - [`DataFetchError::Io`] if the file cannot be read.
/// - [`DataFetchError::Deserialize`] / [`DataFetchError::NotFeatureCollection`]
///   if the body is not a FeatureCollection.
pub async fn load_features(
    client: &reqwest::Client,
    source: &str,
) -> Result<Vec<RawFeature>, DataFetchError> {
    let text = if is_remote(source) {
        fetch_text(client, source).await?
    } else {
        read_text(Path::new(source)).await?
    };
    parse_feature_collection(&text, source)
}

/// Loads and normalizes `source`, never failing.
pub async fn load_records(
    client: &reqwest::Client,
    source: &str,
    region: &RegionBounds,
) -> DataLoad {
    match load_features(client, source).await {
        Ok(features) => {
            let records = normalize(&features, region);
            tracing::info!(
                source,
                features = features.len(),
                records = records.len(),
                "loaded shrine data"
            );
            DataLoad {
                records,
                notice: None,
            }
        }
        Err(error) => {
            tracing::warn!(source, error = %error, "failed to load shrine data");
            DataLoad {
                records: Vec::new(),
                notice: Some(error),
            }
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, DataFetchError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/geo+json, application/json")
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(DataFetchError::UnexpectedStatus {
            status: response.status().as_u16(),
            url: url.to_owned(),
        });
    }
    Ok(response.text().await?)
}

async fn read_text(path: &Path) -> Result<String, DataFetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DataFetchError::Io {
            path: path.display().to_string(),
            source,
        })
}
