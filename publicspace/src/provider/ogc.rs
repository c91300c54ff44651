//! OGC API Features download.

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use geo::{BooleanOps, BoundingRect, MultiPolygon, Rect};
use geojson::GeoJson;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::http::HttpClient;
use super::types::{DataProvider, FetchRequest, FetchSummary, ProviderError};
use crate::overlay::{drop_slivers, guarded, repair};
use crate::source::file::{feature_records, write_records};
use crate::source::Record;

/// PDOK endpoint for BGT.
pub const BGT_API_URL: &str = "https://api.pdok.nl/lv/bgt/ogc/v1";

/// PDOK endpoint for TOP10NL.
pub const TOP10NL_API_URL: &str = "https://api.pdok.nl/brt/top10nl/ogc/v1";

/// RD New, the CRS data is requested and stored in.
pub const RD_NEW_CRS_URI: &str = "http://www.opengis.net/def/crs/EPSG/0/28992";

/// Features requested per page by default.
pub const DEFAULT_PAGE_LIMIT: usize = 1000;

/// Fixed-delay retry for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per request, at least one
    pub max_retries: u32,
    /// Pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Run `attempt` until it succeeds or the attempts are used up.
    ///
    /// Returns the last error on exhaustion.
    pub fn run<T>(
        &self,
        label: &str,
        mut attempt: impl FnMut() -> Result<T, ProviderError>,
    ) -> Result<T, ProviderError> {
        let attempts = self.max_retries.max(1);
        let mut tried = 0;
        loop {
            tried += 1;
            match attempt() {
                Ok(value) => return Ok(value),
                Err(e) if tried < attempts => {
                    warn!("[Attempt {}/{}] Error for {}: {}", tried, attempts, label, e);
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                }
                Err(e) => {
                    warn!("[Attempt {}/{}] Error for {}: {}", tried, attempts, label, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Collection metadata from the `/collections` document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Collection {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize)]
struct CollectionsDocument {
    collections: Vec<Collection>,
}

/// Client for one OGC API Features service.
pub struct OgcFeatureApi {
    name: String,
    base_url: String,
    client: Arc<dyn HttpClient>,
    page_limit: usize,
    retry: RetryPolicy,
    crs: String,
}

impl OgcFeatureApi {
    pub fn new(name: &str, base_url: &str, client: Arc<dyn HttpClient>) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            page_limit: DEFAULT_PAGE_LIMIT,
            retry: RetryPolicy::default(),
            crs: RD_NEW_CRS_URI.to_string(),
        }
    }

    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_crs(mut self, crs: &str) -> Self {
        self.crs = crs.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the collections the service offers.
    pub fn collections(&self) -> Result<Vec<Collection>, ProviderError> {
        let url = format!("{}/collections?f=json", self.base_url);
        let body = self
            .retry
            .run(&format!("{} collections", self.name), || self.client.get(&url))?;
        let document: CollectionsDocument = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", url, e)))?;
        Ok(document.collections)
    }

    /// Download every feature of a collection within `bbox`.
    ///
    /// Pages are followed through their `next` link. Each page request is
    /// retried according to the retry policy.
    pub fn download_collection(
        &self,
        collection: &str,
        bbox: &Rect<f64>,
        snapshot: Option<&str>,
    ) -> Result<Vec<Record>, ProviderError> {
        let mut next = Some(self.first_page_url(collection, bbox, snapshot)?);
        let mut records = Vec::new();
        let mut pages = 0usize;
        let origin = Path::new(collection);

        while let Some(url) = next.take() {
            let body = self.retry.run(collection, || self.client.get(&url))?;
            let text = String::from_utf8_lossy(&body);
            let page = match text.parse::<GeoJson>() {
                Ok(GeoJson::FeatureCollection(page)) => page,
                Ok(_) => {
                    return Err(ProviderError::InvalidResponse(format!(
                        "{}: expected a FeatureCollection",
                        url
                    )))
                }
                Err(e) => return Err(ProviderError::InvalidResponse(format!("{}: {}", url, e))),
            };

            next = page.foreign_members.as_ref().and_then(next_link);
            records.extend(feature_records(page.features, origin)?);
            pages += 1;
        }

        info!(collection, pages, features = records.len(), "Downloaded collection");
        Ok(records)
    }

    fn first_page_url(
        &self,
        collection: &str,
        bbox: &Rect<f64>,
        snapshot: Option<&str>,
    ) -> Result<String, ProviderError> {
        let bbox_param = format!(
            "{},{},{},{}",
            bbox.min().x,
            bbox.min().y,
            bbox.max().x,
            bbox.max().y
        );
        let mut params = vec![
            ("limit", self.page_limit.to_string()),
            ("crs", self.crs.clone()),
            ("bbox-crs", self.crs.clone()),
            ("bbox", bbox_param),
        ];
        if let Some(snapshot) = snapshot {
            params.push(("datetime", snapshot.to_string()));
        }

        let base = format!("{}/collections/{}/items", self.base_url, collection);
        Url::parse_with_params(&base, &params)
            .map(String::from)
            .map_err(|e| ProviderError::InvalidResponse(format!("{}: {}", base, e)))
    }
}

impl DataProvider for OgcFeatureApi {
    fn name(&self) -> &str {
        &self.name
    }

    /// Download all collections, clip them to the mask and write the
    /// non-empty ones as `{collection}.geojson`.
    fn fetch(&self, request: &FetchRequest) -> Result<FetchSummary, ProviderError> {
        let bbox = request
            .mask
            .bounding_rect()
            .ok_or_else(|| ProviderError::InvalidMask("area of interest is empty".to_string()))?;
        let mask = repair(&request.mask, "area of interest")?;
        let snapshot = request
            .snapshot
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string());

        info!(provider = %self.name, url = %self.base_url, "Start downloading");
        let mut summary = FetchSummary::default();

        for collection in self.collections()? {
            info!("Start downloading: {}", collection.id);
            let records = match self.download_collection(&collection.id, &bbox, snapshot.as_deref()) {
                Ok(records) => records,
                Err(e) => {
                    error!("Failed to download {}: {}", collection.id, e);
                    summary.failed.push(collection.id);
                    continue;
                }
            };

            let clipped = clip_to_mask(records, &mask, &collection.id)?;
            if clipped.is_empty() {
                info!("No features in {}, skipping layer", collection.id);
                summary.empty.push(collection.id);
                continue;
            }

            let path = request.output_dir.join(format!("{}.geojson", collection.id));
            write_records(&path, &clipped, &collection.id, Some(&self.crs)).map_err(|e| {
                ProviderError::WriteFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            summary.written.push((collection.id, clipped.len()));
        }

        Ok(summary)
    }
}

/// `href` of the `rel=next` link in an OGC page, if any.
fn next_link(members: &geojson::JsonObject) -> Option<String> {
    members
        .get("links")?
        .as_array()?
        .iter()
        .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))
        .and_then(|link| link.get("href"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn clip_to_mask(
    records: Vec<Record>,
    mask: &MultiPolygon<f64>,
    collection: &str,
) -> Result<Vec<Record>, ProviderError> {
    let mut clipped = Vec::with_capacity(records.len());
    for record in records {
        let geometry = guarded("intersection", collection, || record.geometry.intersection(mask))
            .map_err(|e| ProviderError::ClipFailed {
                collection: collection.to_string(),
                reason: e.to_string(),
            })?;
        let geometry = drop_slivers(geometry);
        if !geometry.0.is_empty() {
            clipped.push(Record::new(geometry, record.attributes));
        }
    }
    Ok(clipped)
}
