//! JSON:API transport over HTTP
//!
//! Implements the core [`Transport`] port with reqwest. Every non-success
//! status is mapped onto its classified [`ApiError`] variant here, at the
//! transport boundary, so the execution wrapper can branch on typed errors
//! instead of inspecting responses: HTTP 404 becomes the distinguishable
//! "not found" signal, everything else its remote-failure class.

use std::sync::Arc;

use async_trait::async_trait;
use flock_core::Transport;
use flock_domain::{
    ApiError, PageCursor, PageLinks, PageMeta, RawPage, Result, DEFAULT_PAGE_SIZE,
};
use reqwest::{Client as ReqwestClient, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::auth::AccessTokenProvider;
use crate::config::ClientConfig;

/// JSON:API connection over HTTP
pub struct JsonApiConnection {
    http: ReqwestClient,
    config: ClientConfig,
    auth: Arc<dyn AccessTokenProvider>,
}

impl JsonApiConnection {
    /// Create a connection from configuration and an auth provider
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(config: ClientConfig, auth: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let http = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, auth })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Response> {
        let token = self.auth.access_token().await?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, url, "sending API request");

        let response = request.send().await.map_err(|e| self.map_transport_error(e))?;
        let status = response.status();

        debug!(%method, url, %status, "received API response");

        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, url, body_text));
        }

        Ok(response)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.timeout)
        } else {
            ApiError::Network(format!("http request failed: {}", err))
        }
    }
}

async fn parse_document(response: Response) -> Result<Value> {
    let status = response.status();

    // 204/205 have no body by RFC spec
    if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
        return Ok(Value::Null);
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Client(format!("failed to parse response: {}", e)))
}

#[async_trait]
impl Transport for JsonApiConnection {
    #[instrument(skip(self, query), fields(path = %path))]
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let url = self.url_for(path);
        let response = self.send(Method::GET, &url, query, None).await?;
        parse_document(response).await
    }

    #[instrument(skip(self))]
    async fn get_paged(&self, cursor: &PageCursor) -> Result<RawPage> {
        let (url, query, per_page_hint, offset_hint) = match cursor {
            PageCursor::Start { path, query, per_page } => {
                let mut query = query.clone();
                query.push(("per_page".to_string(), per_page.to_string()));
                (self.url_for(path), query, Some(*per_page), Some(0))
            }
            PageCursor::Link(link) => {
                // The server's link is authoritative; follow it verbatim and
                // recover sizing hints from its query string.
                let (per_page, offset) = page_position(link);
                (link.clone(), Vec::new(), per_page, offset)
            }
        };

        let response = self.send(Method::GET, &url, &query, None).await?;
        let document: PagedDocument = response
            .json()
            .await
            .map_err(|e| ApiError::Client(format!("failed to parse paged response: {}", e)))?;

        let per_page =
            per_page_hint.or(document.meta.per_page).unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let current_page = offset_hint.map_or(1, |offset| offset / per_page + 1);

        Ok(RawPage {
            meta: PageMeta::new(document.meta.total_count, per_page, current_page),
            links: document.links,
            items: document.data,
        })
    }

    #[instrument(skip(self, body), fields(path = %path))]
    async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url_for(path);
        let response = self.send(Method::POST, &url, &[], Some(body)).await?;
        parse_document(response).await
    }

    #[instrument(skip(self, body), fields(path = %path))]
    async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url_for(path);
        let response = self.send(Method::PATCH, &url, &[], Some(body)).await?;
        parse_document(response).await
    }

    #[instrument(skip(self), fields(path = %path))]
    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url_for(path);
        self.send(Method::DELETE, &url, &[], None).await?;
        Ok(())
    }
}

/// Top-level JSON:API document for a paged collection
#[derive(Debug, Deserialize)]
struct PagedDocument {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    meta: DocumentMeta,
    #[serde(default)]
    links: PageLinks,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentMeta {
    #[serde(default)]
    total_count: usize,
    #[serde(default)]
    per_page: Option<usize>,
}

/// Recover (per_page, offset) hints from a followed link's query string
fn page_position(link: &str) -> (Option<usize>, Option<usize>) {
    let Ok(url) = Url::parse(link) else {
        return (None, None);
    };

    let mut per_page = None;
    let mut offset = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "per_page" => per_page = value.parse().ok(),
            "offset" => offset = value.parse().ok(),
            _ => {}
        }
    }
    (per_page, offset)
}

fn map_status_error(status: StatusCode, url: &str, body: String) -> ApiError {
    let message = if body.is_empty() {
        format!("{} returned status {}", url, status)
    } else {
        format!("{} returned status {}: {}", url, status, body)
    };

    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound(message)
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ApiError::Auth(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ApiError::RateLimit(message)
    } else if status.is_server_error() {
        ApiError::Server(message)
    } else if status.is_client_error() {
        ApiError::Client(message)
    } else {
        ApiError::Network(message)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::auth::StaticTokenProvider;

    async fn connection(server: &MockServer) -> JsonApiConnection {
        let config = ClientConfig::builder().base_url(server.uri()).build().expect("config");
        let auth = Arc::new(StaticTokenProvider::new("test-token"));
        JsonApiConnection::new(config, auth).expect("connection")
    }

    #[tokio::test]
    async fn test_get_returns_document() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/people/1"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": "1", "name": "Avery"}})),
            )
            .mount(&server)
            .await;

        let document =
            connection(&server).await.get("/people/1", &[]).await.expect("document");
        assert_eq!(document["data"]["name"], "Avery");
    }

    #[tokio::test]
    async fn test_get_forwards_query_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("where[status]", "active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let query = vec![("where[status]".to_string(), "active".to_string())];
        let document = connection(&server).await.get("/people", &query).await.expect("document");
        assert_eq!(document["data"], json!([]));
    }

    #[tokio::test]
    async fn test_get_maps_404_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/people/99"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let result = connection(&server).await.get("/people/99", &[]).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_status_classification() {
        let server = MockServer::start().await;
        for (status, route) in
            [(401, "/auth"), (429, "/limited"), (500, "/error"), (422, "/invalid")]
        {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let conn = connection(&server).await;
        assert!(matches!(conn.get("/auth", &[]).await, Err(ApiError::Auth(_))));
        assert!(matches!(conn.get("/limited", &[]).await, Err(ApiError::RateLimit(_))));
        assert!(matches!(conn.get("/error", &[]).await, Err(ApiError::Server(_))));
        assert!(matches!(conn.get("/invalid", &[]).await, Err(ApiError::Client(_))));
    }

    #[tokio::test]
    async fn test_post_sends_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/people"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "7"}})),
            )
            .mount(&server)
            .await;

        let body = json!({"data": {"attributes": {"name": "Avery"}}});
        let document = connection(&server).await.post("/people", &body).await.expect("document");
        assert_eq!(document["data"]["id"], "7");
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/people/1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        connection(&server).await.delete("/people/1").await.expect("deleted");
    }

    #[tokio::test]
    async fn test_get_paged_parses_envelope() {
        let server = MockServer::start().await;

        let next = format!("{}/people?per_page=2&offset=2", server.uri());
        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "1"}, {"id": "2"}],
                "meta": {"total_count": 5, "count": 2},
                "links": {"self": format!("{}/people?per_page=2", server.uri()), "next": next},
            })))
            .mount(&server)
            .await;

        let cursor = PageCursor::start("/people").with_per_page(2);
        let page = connection(&server).await.get_paged(&cursor).await.expect("page");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.meta.total_count, 5);
        assert_eq!(page.meta.per_page, 2);
        assert_eq!(page.meta.current_page, 1);
        assert!(page.links.next.is_some());
    }

    #[tokio::test]
    async fn test_get_paged_follows_link_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/people"))
            .and(query_param("offset", "2"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": "3"}, {"id": "4"}],
                "meta": {"total_count": 5, "count": 2},
                "links": {},
            })))
            .mount(&server)
            .await;

        let link = format!("{}/people?per_page=2&offset=2", server.uri());
        let page =
            connection(&server).await.get_paged(&PageCursor::Link(link)).await.expect("page");

        assert_eq!(page.meta.per_page, 2);
        assert_eq!(page.meta.current_page, 2);
        assert!(page.links.is_terminal());
    }

    #[test]
    fn test_page_position_ignores_unparseable_links() {
        assert_eq!(page_position("not a url"), (None, None));
        assert_eq!(
            page_position("https://api.example.com/people?per_page=25&offset=50"),
            (Some(25), Some(50))
        );
    }
}
