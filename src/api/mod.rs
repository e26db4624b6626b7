pub mod types;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Response;
use reqwest::header::{self, HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::api::types::{CatalogResponse, Movie};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {detail}")]
    Status { status: u16, detail: String },
    #[error("API reported failure: {0}")]
    Api(String),
    #[error("deserialization error: {0}")]
    Deserialize(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Everything the catalog client needs, passed in explicitly at construction.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
}

impl CatalogConfig {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, CatalogError> {
        Url::parse(base_url).map_err(|e| CatalogError::Config(format!("{base_url}: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

/// Percent-encoding set for URL query values (encode everything except unreserved chars).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_query(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
}

impl TmdbClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| CatalogError::Config(format!("API key is not a valid header: {e}")))?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// URL for a query: keyword search when the term is non-empty, otherwise
    /// the popularity-ranked discovery listing.
    pub fn endpoint(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
        } else {
            format!("{}/search/movie?query={}", self.base_url, encode_query(query))
        }
    }

    /// Fetch the ranked movie list for a query (empty query = discover).
    pub async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let url = self.endpoint(query);
        tracing::debug!(%url, "catalog request");
        let resp = self.http.get(&url).send().await?;
        let body = self.handle_response(resp).await?;
        if let Some(message) = body.failure() {
            return Err(CatalogError::Api(message));
        }
        Ok(body.results.unwrap_or_default())
    }

    /// Check status and deserialize the response body.
    async fn handle_response(&self, resp: Response) -> Result<CatalogResponse, CatalogError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Status {
                status: status.as_u16(),
                detail: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<CatalogResponse>(&body)
            .map_err(|e| CatalogError::Deserialize(format!("{e}: {body}")))
    }
}
