//! Router, shared state and error responses.

use crate::error::Error;
use crate::handlers;
use crate::reuters::client::ReutersClient;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State built once in `main` and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: ReutersClient,
    /// Pages a single request may have in flight at once.
    pub page_concurrency: usize,
}

impl AppState {
    pub fn new(client: ReutersClient, page_concurrency: usize) -> Self {
        Self {
            client,
            page_concurrency: page_concurrency.max(1),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/list-sections", get(handlers::list_sections))
        .route("/reuters-by-search/", post(handlers::reuters_by_search))
        .route("/reuters-by-section/", post(handlers::reuters_by_section))
        .route("/reuters/", post(handlers::reuters_legacy))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// A pipeline failure on its way out as an HTTP response.
///
/// Upstream failures answer 502, bad records 500. The body is
/// `{"detail": "<message>"}`.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_upstream() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use mockito::Matcher;
    use serde_json::Value;
    use std::time::Duration;
    use tower::util::ServiceExt;

    const SEARCH_PATH: &str = "/pf/api/v3/content/fetch/articles-by-search-v2";
    const SECTION_PATH: &str = "/pf/api/v3/content/fetch/articles-by-section-alias-or-id-v1";

    fn app_for(server: &mockito::Server) -> Router {
        let client = ReutersClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        create_app(AppState::new(client, 1))
    }

    fn offline_app() -> Router {
        // Nothing listens on port 9; any outbound call would fail.
        let client = ReutersClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        create_app(AppState::new(client, 1))
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if body.is_some() {
            request = request.header("content-type", "application/json");
        }
        let request = request
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn page_body(articles: Value) -> String {
        json!({ "result": { "articles": articles } }).to_string()
    }

    #[tokio::test]
    async fn test_root_info() {
        let (status, body) = send(offline_app(), Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"info": {"title": "ReutersAPI", "version": "2022.12.29"}}));
    }

    #[tokio::test]
    async fn test_list_sections() {
        let (status, body) = send(offline_app(), Method::GET, "/list-sections", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"info": {"sections": ["world", "business"]}}));
    }

    #[tokio::test]
    async fn test_search_returns_deduplicated_sorted_envelope() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::UrlEncoded(
                "query".into(),
                r#"{"keyword":"oil","offset":0,"orderby":"display_date:desc","size":20,"website":"reuters"}"#.into(),
            ))
            .with_body(page_body(json!([
                {"id": "1", "title": "A", "description": "d", "published_time": "2022-12-01T10:00:00Z", "canonical_url": "/world/x"},
                {"id": "5", "title": "B", "description": "e", "published_time": "2022-12-02T10:00:00Z", "canonical_url": "/world/y"}
            ])))
            .create_async()
            .await;
        let second = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::UrlEncoded(
                "query".into(),
                r#"{"keyword":"oil","offset":20,"orderby":"display_date:desc","size":20,"website":"reuters"}"#.into(),
            ))
            .with_body(page_body(json!([
                {"id": "5", "title": "B", "description": "e", "published_time": "2022-12-02T10:00:00Z", "canonical_url": "/world/y"}
            ])))
            .create_async()
            .await;

        let (status, body) = send(
            app_for(&server),
            Method::POST,
            "/reuters-by-search/",
            Some(r#"{"search": "oil", "pages": 2}"#),
        )
        .await;

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["length"], 2);
        assert_eq!(body["data"][0]["id"], "5");
        assert_eq!(body["data"][1], json!({
            "id": "1",
            "title": "A",
            "description": "d",
            "date": "2022-12-01",
            "time": "10:00:00",
            "link": "https://www.reuters.com/world/x"
        }));
    }

    #[tokio::test]
    async fn test_section_defaults_to_business() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SECTION_PATH)
            .match_query(Matcher::Regex("business".into()))
            .with_body(page_body(json!([])))
            .expect(1)
            .create_async()
            .await;

        let (status, body) =
            send(app_for(&server), Method::POST, "/reuters-by-section/", Some("{}")).await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"length": 0, "data": []}));
    }

    #[tokio::test]
    async fn test_non_positive_pages_are_empty_without_upstream_calls() {
        for pages in ["0", "-2"] {
            let (status, body) = send(
                offline_app(),
                Method::POST,
                "/reuters-by-search/",
                Some(&format!(r#"{{"search": "oil", "pages": {pages}}}"#)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"length": 0, "data": []}));
        }
    }

    #[tokio::test]
    async fn test_missing_articles_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SECTION_PATH)
            .match_query(Matcher::Any)
            .with_body(r#"{"result": {"section": {}}}"#)
            .create_async()
            .await;

        let (status, body) = send(
            app_for(&server),
            Method::POST,
            "/reuters-by-section/",
            Some(r#"{"section": "world", "pages": 1}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.get("data").is_none());
        assert!(body["detail"].as_str().unwrap().contains("result.articles"));
    }

    #[tokio::test]
    async fn test_bad_record_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_body(page_body(json!([
                {"id": "9", "title": "A", "description": "d", "published_time": "soon", "canonical_url": "/x"}
            ])))
            .create_async()
            .await;

        let (status, body) = send(
            app_for(&server),
            Method::POST,
            "/reuters-by-search/",
            Some(r#"{"search": "oil"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("article 9"));
    }

    #[tokio::test]
    async fn test_mistyped_field_is_internal_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_body(page_body(json!([
                {"id": 5, "title": "A", "description": "d", "published_time": "2022-12-01T10:00:00Z", "canonical_url": "/x"}
            ])))
            .create_async()
            .await;

        let (status, body) = send(
            app_for(&server),
            Method::POST,
            "/reuters-by-search/",
            Some(r#"{"search": "oil"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("field `id` should be a string, got number"));
    }

    #[tokio::test]
    async fn test_null_description_is_served_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_body(page_body(json!([
                {"id": "1", "title": "A", "description": null, "published_time": "2022-12-01T10:00:00Z", "canonical_url": "/x"}
            ])))
            .create_async()
            .await;

        let (status, body) = send(
            app_for(&server),
            Method::POST,
            "/reuters-by-search/",
            Some(r#"{"search": "oil"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["description"], "");
    }

    #[tokio::test]
    async fn test_legacy_endpoint_keeps_duplicates_and_omits_links() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", SEARCH_PATH)
            .match_query(Matcher::Any)
            .with_body(page_body(json!([
                {"id": "1", "title": "A", "description": "d", "published_time": "2022-12-01T10:00:00Z"},
                {"id": "2", "title": "B", "description": "e", "published_time": "2022-12-03T10:00:00Z"}
            ])))
            .expect(2)
            .create_async()
            .await;

        let (status, body) = send(
            app_for(&server),
            Method::POST,
            "/reuters/",
            Some(r#"{"search": "oil", "pages": 2}"#),
        )
        .await;

        mock.assert_async().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["length"], 4);
        let ids: Vec<_> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2", "1", "2"]);
        assert!(body["data"][0].get("link").is_none());
    }

    #[tokio::test]
    async fn test_wrong_body_types_are_rejected() {
        let (status, _) = send(
            offline_app(),
            Method::POST,
            "/reuters-by-search/",
            Some(r#"{"search": "oil", "pages": "many"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
