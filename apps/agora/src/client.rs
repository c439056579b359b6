//! # Overview Service HTTP Client
//!
//! Wrapper around the overview and path-finding REST services. The server
//! performs all aggregation; this client only shapes requests from the
//! current filter state and decodes the JSON snapshots.

use crate::store::OverviewFetcher;
use agora_core::overview::{
    ArgumentEvidenceOverview, ConceptClusterOverview, InfluenceMatrix, PathRequest, PathResponse,
    TimelineOverview,
};
use agora_core::{FilterState, GraphDocument};
use serde::de::DeserializeOwned;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the HTTP client layer.
#[derive(Debug, Clone)]
pub enum FetchError {
    /// Cannot reach the overview server.
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing API key.
    Unauthorized,
    /// 429 Too Many Requests.
    RateLimited,
    /// Server returned a 5xx error.
    ServerError(u16, String),
    /// Failed to parse a response body.
    ParseError(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to overview service at {url}"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or missing API key"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::ServerError(status, msg) => write!(f, "Server error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client that wraps calls to the overview REST services.
#[derive(Clone)]
pub struct OverviewClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OverviewClient {
    /// Create a new client pointing at the given service URL.
    #[must_use]
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Build a request with optional Bearer auth.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        req
    }

    /// Send a request and map transport failures.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, FetchError> {
        req.send()
            .await
            .map_err(|e| FetchError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// Handle HTTP response: check status codes and decode JSON.
    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, FetchError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::ServerError(status.as_u16(), body));
        }
        resp.json::<T>()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// GET an overview endpoint with the filter state as query parameters.
    async fn get_overview<T: DeserializeOwned>(
        &self,
        path: &str,
        filters: &FilterState,
    ) -> Result<T, FetchError> {
        let req = self
            .request(reqwest::Method::GET, path)
            .query(&filter_query(filters));
        let resp = self.send(req).await?;
        self.decode(resp).await
    }

    /// GET /graph → the full Cytoscape-shaped network document.
    pub async fn full_graph(&self, filters: &FilterState) -> Result<GraphDocument, FetchError> {
        self.get_overview("/graph", filters).await
    }
}

/// Flatten a filter state into repeatable query parameters. Empty
/// dimensions are omitted entirely, matching what the services expect.
fn filter_query(filters: &FilterState) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if !filters.node_kinds.is_empty() {
        query.push((
            "nodeTypes",
            filters.node_kinds.iter().cloned().collect::<Vec<_>>().join(","),
        ));
    }
    if !filters.periods.is_empty() {
        query.push((
            "periods",
            filters.periods.iter().cloned().collect::<Vec<_>>().join(","),
        ));
    }
    if !filters.schools.is_empty() {
        query.push((
            "schools",
            filters.schools.iter().cloned().collect::<Vec<_>>().join(","),
        ));
    }
    if !filters.relations.is_empty() {
        query.push((
            "relations",
            filters.relations.iter().cloned().collect::<Vec<_>>().join(","),
        ));
    }
    if !filters.search_term.is_empty() {
        query.push(("search", filters.search_term.clone()));
    }
    query
}

// =============================================================================
// FETCHER IMPLEMENTATION
// =============================================================================

impl OverviewFetcher for OverviewClient {
    /// GET /overview/timeline
    async fn timeline(&self, filters: &FilterState) -> Result<TimelineOverview, FetchError> {
        self.get_overview("/overview/timeline", filters).await
    }

    /// GET /overview/matrix
    async fn influence_matrix(&self, filters: &FilterState) -> Result<InfluenceMatrix, FetchError> {
        self.get_overview("/overview/matrix", filters).await
    }

    /// GET /overview/evidence
    async fn argument_evidence(
        &self,
        filters: &FilterState,
    ) -> Result<ArgumentEvidenceOverview, FetchError> {
        self.get_overview("/overview/evidence", filters).await
    }

    /// GET /overview/clusters
    async fn concept_clusters(
        &self,
        filters: &FilterState,
    ) -> Result<ConceptClusterOverview, FetchError> {
        self.get_overview("/overview/clusters", filters).await
    }

    /// POST /path
    async fn compute_path(&self, request: &PathRequest) -> Result<PathResponse, FetchError> {
        let req = self.request(reqwest::Method::POST, "/path").json(request);
        let resp = self.send(req).await?;
        self.decode(resp).await
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::FilterPatch;

    #[test]
    fn empty_filters_produce_no_query_parameters() {
        assert!(filter_query(&FilterState::default()).is_empty());
    }

    #[test]
    fn filter_query_joins_sets_in_canonical_order() {
        let filters = FilterPatch {
            node_kinds: Some(vec!["work".to_string(), "person".to_string()]),
            search_term: Some("logos".to_string()),
            ..FilterPatch::default()
        }
        .apply(&FilterState::default());

        let query = filter_query(&filters);
        assert_eq!(
            query,
            vec![
                ("nodeTypes", "person,work".to_string()),
                ("search", "logos".to_string()),
            ]
        );
    }
}
