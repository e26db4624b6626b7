use reqwest::Response;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{SearchCountStore, StoreError};
use crate::api::types::{Movie, TrendingEntry};

/// Connection details for an Appwrite documents collection.
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<SearchDocument>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "searchTerm")]
    search_term: String,
    #[serde(default)]
    count: u64,
    #[serde(default)]
    movie_id: u64,
    #[serde(default)]
    poster_url: Option<String>,
}

impl From<SearchDocument> for TrendingEntry {
    fn from(doc: SearchDocument) -> Self {
        Self {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id,
            poster_url: doc.poster_url.filter(|u| !u.is_empty()),
        }
    }
}

fn query_equal(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

fn query_order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

fn query_limit(limit: usize) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct AppwriteStore {
    http: reqwest::Client,
    documents_url: String,
    image_base: String,
}

impl AppwriteStore {
    pub fn new(config: AppwriteConfig, image_base: impl Into<String>) -> Result<Self, StoreError> {
        if config.project_id.is_empty()
            || config.database_id.is_empty()
            || config.collection_id.is_empty()
        {
            return Err(StoreError::Config(
                "project_id, database_id and collection_id are required".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-appwrite-project"),
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| StoreError::Config(format!("project_id: {e}")))?,
        );
        if let Some(key) = config.api_key.as_deref() {
            headers.insert(
                HeaderName::from_static("x-appwrite-key"),
                HeaderValue::from_str(key)
                    .map_err(|e| StoreError::Config(format!("api key: {e}")))?,
            );
        }
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.database_id,
            config.collection_id,
        );

        Ok(Self {
            http,
            documents_url,
            image_base: image_base.into(),
        })
    }

    async fn list(&self, queries: &[String]) -> Result<Vec<SearchDocument>, StoreError> {
        let params: Vec<(&str, &str)> = queries.iter().map(|q| ("queries[]", q.as_str())).collect();
        let resp = self
            .http
            .get(&self.documents_url)
            .query(&params)
            .send()
            .await?;
        let list: DocumentList = self.handle_response(resp).await?;
        Ok(list.documents)
    }

    /// Check status and deserialize the response body.
    async fn handle_response<T: DeserializeOwned>(&self, resp: Response) -> Result<T, StoreError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                detail: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| StoreError::Deserialize(format!("{e}: {body}")))
    }
}

impl SearchCountStore for AppwriteStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> Result<(), StoreError> {
        let existing = self
            .list(&[query_equal("searchTerm", term), query_limit(1)])
            .await?;

        let resp = if let Some(doc) = existing.into_iter().next() {
            tracing::debug!(term, id = %doc.id, count = doc.count, "incrementing search count");
            self.http
                .patch(format!("{}/{}", self.documents_url, doc.id))
                .json(&json!({ "data": { "count": doc.count + 1 } }))
                .send()
                .await?
        } else {
            tracing::debug!(term, movie_id = movie.id, "creating search count record");
            self.http
                .post(&self.documents_url)
                .json(&json!({
                    "documentId": "unique()",
                    "data": {
                        "searchTerm": term,
                        "count": 1,
                        "movie_id": movie.id,
                        "poster_url": movie.poster_url(&self.image_base).unwrap_or_default(),
                    }
                }))
                .send()
                .await?
        };

        let _: serde_json::Value = self.handle_response(resp).await?;
        Ok(())
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, StoreError> {
        let docs = self
            .list(&[query_order_desc("count"), query_limit(limit)])
            .await?;
        Ok(docs.into_iter().map(TrendingEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DOCS: &str = "/databases/db1/collections/metrics/documents";

    fn store(endpoint: &str) -> AppwriteStore {
        AppwriteStore::new(
            AppwriteConfig {
                endpoint: endpoint.to_string(),
                project_id: "proj".into(),
                database_id: "db1".into(),
                collection_id: "metrics".into(),
                api_key: Some("secret".into()),
            },
            "https://image.tmdb.org/t/p",
        )
        .unwrap()
    }

    fn movie() -> Movie {
        serde_json::from_str(r#"{"id": 155, "title": "The Dark Knight", "poster_path": "/qJ2.jpg"}"#)
            .unwrap()
    }

    #[test]
    fn requires_collection_ids() {
        let result = AppwriteStore::new(
            AppwriteConfig {
                endpoint: "https://cloud.appwrite.io/v1".into(),
                project_id: "proj".into(),
                database_id: String::new(),
                collection_id: "c".into(),
                api_key: None,
            },
            "",
        );
        assert!(matches!(result, Err(StoreError::Config(_))));
    }

    #[tokio::test]
    async fn creates_document_for_new_term() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOCS))
            .and(header("x-appwrite-project", "proj"))
            .and(query_param("queries[]", query_equal("searchTerm", "batman")))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"total":0,"documents":[]}"#))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(DOCS))
            .and(header("x-appwrite-key", "secret"))
            .and(body_partial_json(json!({
                "data": {
                    "searchTerm": "batman",
                    "count": 1,
                    "movie_id": 155,
                    "poster_url": "https://image.tmdb.org/t/p/w500/qJ2.jpg"
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"$id":"new"}"#))
            .expect(1)
            .mount(&server)
            .await;

        SearchCountStore::record_search(&store(&server.uri()), "batman", &movie())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn increments_existing_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOCS))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"total":1,"documents":[{"$id":"doc7","searchTerm":"batman","count":4,"movie_id":155,"poster_url":""}]}"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path(format!("{DOCS}/doc7")))
            .and(body_partial_json(json!({ "data": { "count": 5 } })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"$id":"doc7"}"#))
            .expect(1)
            .mount(&server)
            .await;

        SearchCountStore::record_search(&store(&server.uri()), "batman", &movie())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn trending_requests_ordered_limited_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DOCS))
            .and(query_param("queries[]", query_order_desc("count")))
            .and(query_param("queries[]", query_limit(5)))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"total":2,"documents":[
                    {"$id":"a","searchTerm":"dune","count":9,"movie_id":438631,"poster_url":"https://img/d.jpg"},
                    {"$id":"b","searchTerm":"up","count":3,"movie_id":14160,"poster_url":""}
                ]}"#,
            ))
            .mount(&server)
            .await;

        let top = SearchCountStore::trending(&store(&server.uri()), 5)
            .await
            .unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].search_term, "dune");
        assert_eq!(top[0].count, 9);
        assert_eq!(top[1].poster_url, None);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message":"missing scope"}"#))
            .mount(&server)
            .await;

        let err = SearchCountStore::trending(&store(&server.uri()), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 401, .. }));
    }
}
