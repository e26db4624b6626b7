use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog response wrapper
// ---------------------------------------------------------------------------

/// Body of a search or discover response.
///
/// A successful response carries `results`. Failures come in two shapes: the
/// `{"Response":"False","Error":"..."}` payload and TMDB's own
/// `{"success":false,"status_message":"..."}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status_message: Option<String>,
}

impl CatalogResponse {
    /// The API-reported failure message, if the payload is a failure.
    pub fn failure(&self) -> Option<String> {
        if self
            .response
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("false"))
        {
            return Some(
                self.error
                    .clone()
                    .unwrap_or_else(|| "Failed to fetch movies".to_string()),
            );
        }
        if self.success == Some(false) {
            return Some(
                self.status_message
                    .clone()
                    .unwrap_or_else(|| "Failed to fetch movies".to_string()),
            );
        }
        None
    }
}

// ---------------------------------------------------------------------------
// Movie
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Movie {
    /// Title to display, falling back to the original title.
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        self.original_title.as_deref().unwrap_or("Untitled")
    }

    /// Average rating with one decimal, or `N/A` when unrated.
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{v:.1}"),
            _ => "N/A".to_string(),
        }
    }

    /// Release year, or `N/A` when the date is missing.
    pub fn year_label(&self) -> String {
        let Some(date) = self.release_date.as_deref().filter(|d| !d.is_empty()) else {
            return "N/A".to_string();
        };
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => parsed.year().to_string(),
            Err(_) => date.split('-').next().unwrap_or(date).to_string(),
        }
    }

    /// Full poster URL under the given image base, if the movie has a poster.
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| {
                format!(
                    "{}/w500/{}",
                    image_base.trim_end_matches('/'),
                    p.trim_start_matches('/')
                )
            })
    }
}

// ---------------------------------------------------------------------------
// Trending
// ---------------------------------------------------------------------------

/// One aggregated search term as reported by the search-count store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingEntry {
    pub id: String,
    pub search_term: String,
    pub count: u64,
    pub movie_id: u64,
    #[serde(default)]
    pub poster_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(json: &str) -> Movie {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_sparse_movie() {
        let m = movie(r#"{"id": 42}"#);
        assert_eq!(m.id, 42);
        assert_eq!(m.display_title(), "Untitled");
        assert_eq!(m.rating_label(), "N/A");
        assert_eq!(m.year_label(), "N/A");
        assert_eq!(m.poster_url("https://image.tmdb.org/t/p"), None);
    }

    #[test]
    fn labels_for_full_movie() {
        let m = movie(
            r#"{"id": 27205, "title": "Inception", "original_title": "Inception",
                "vote_average": 8.369, "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
                "release_date": "2010-07-15", "original_language": "en"}"#,
        );
        assert_eq!(m.display_title(), "Inception");
        assert_eq!(m.rating_label(), "8.4");
        assert_eq!(m.year_label(), "2010");
        assert_eq!(
            m.poster_url("https://image.tmdb.org/t/p/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg")
        );
    }

    #[test]
    fn falls_back_to_original_title() {
        let m = movie(r#"{"id": 1, "title": "", "original_title": "君の名は。"}"#);
        assert_eq!(m.display_title(), "君の名は。");
    }

    #[test]
    fn year_label_tolerates_partial_dates() {
        let m = movie(r#"{"id": 1, "release_date": "1999"}"#);
        assert_eq!(m.year_label(), "1999");
        let m = movie(r#"{"id": 1, "release_date": ""}"#);
        assert_eq!(m.year_label(), "N/A");
    }

    #[test]
    fn detects_response_false_failure() {
        let resp: CatalogResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Invalid API key"}"#).unwrap();
        assert_eq!(resp.failure().as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn detects_tmdb_status_failure() {
        let resp: CatalogResponse = serde_json::from_str(
            r#"{"status_code": 7, "status_message": "Invalid API key", "success": false}"#,
        )
        .unwrap();
        assert_eq!(resp.failure().as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn success_payload_is_not_a_failure() {
        let resp: CatalogResponse =
            serde_json::from_str(r#"{"page": 1, "results": [], "total_results": 0}"#).unwrap();
        assert!(resp.failure().is_none());
        assert_eq!(resp.results.map(|r| r.len()), Some(0));
    }
}
