//! Source data download.
//!
//! A [`DataProvider`] fills a directory with one GeoJSON file per layer for
//! an area of interest. [`OgcFeatureApi`] implements it for OGC API Features
//! services such as the PDOK BGT and TOP10NL endpoints.
//!
//! HTTP access goes through the [`HttpClient`] trait so tests can script
//! responses.
//!
//! ```ignore
//! use std::sync::Arc;
//! use publicspace::provider::{OgcFeatureApi, ReqwestClient, BGT_API_URL};
//!
//! let client = Arc::new(ReqwestClient::new()?);
//! let bgt = OgcFeatureApi::new("BGT", BGT_API_URL, client);
//! ```

mod http;
mod ogc;
mod types;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use ogc::{
    Collection, OgcFeatureApi, RetryPolicy, BGT_API_URL, DEFAULT_PAGE_LIMIT, RD_NEW_CRS_URI,
    TOP10NL_API_URL,
};
pub use types::{DataProvider, FetchRequest, FetchSummary, ProviderError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
