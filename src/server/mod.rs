//! HTTP server.
//!
//! Routes:
//! - `/` - help text
//! - `/servers` - hint text
//! - `/servers/{domain}` - scan, assess and record `domain`
//! - `/history` - domains with at least one snapshot
//! - `/history/{domain}` - stored snapshots of `domain`

mod handlers;
mod types;

use axum::routing::get;
use axum::Router;

use crate::whois::RegistrantLookup;
use handlers::{
    assess_handler, domain_history_handler, history_handler, home_handler, servers_hint_handler,
};

pub use handlers::DomainHistory;
pub use types::{ApiError, AppState, ErrorBody};

/// Builds the router over `state`.
pub fn build_router<L>(state: AppState<L>) -> Router
where
    L: RegistrantLookup + 'static,
{
    Router::new()
        .route("/", get(home_handler))
        .route("/servers", get(servers_hint_handler))
        .route("/servers/", get(servers_hint_handler))
        .route("/servers/{domain}", get(assess_handler::<L>))
        .route("/history", get(history_handler::<L>))
        .route("/history/{domain}", get(domain_history_handler::<L>))
        .with_state(state)
}

/// Creates and starts the server on `127.0.0.1:{port}`.
pub async fn start_server<L>(port: u16, state: AppState<L>) -> Result<(), anyhow::Error>
where
    L: RegistrantLookup + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to port {}: {}", port, e))?;

    log::info!("Server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Assess: http://127.0.0.1:{}/servers/{{domain}}", port);
    log::info!("  - History: http://127.0.0.1:{}/history", port);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::page::PageFetcher;
    use crate::pipeline::Assessor;
    use crate::scan::ScanClient;
    use crate::storage::test_helpers::create_test_pool;
    use crate::storage::SnapshotStore;
    use crate::whois::Registrant;

    struct StaticRegistrant;

    impl RegistrantLookup for StaticRegistrant {
        async fn lookup(&self, _host: &str) -> Registrant {
            Registrant {
                country: Some("US".to_string()),
                organization: Some("Example Inc".to_string()),
            }
        }
    }

    async fn test_state(upstream: &str) -> AppState<StaticRegistrant> {
        let store = SnapshotStore::new(Arc::new(create_test_pool().await));
        let client = Arc::new(reqwest::Client::new());
        AppState::new(
            Assessor::new(store, StaticRegistrant),
            ScanClient::new(Arc::clone(&client), upstream, 1, Duration::ZERO),
            PageFetcher::new(client, format!("{}/allicons.json", upstream))
                .with_site_url(format!("{}/site", upstream)),
        )
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn mount_ready_scan(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/analyze"))
            .and(query_param("host", "example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"host":"example.com","status":"READY","endpoints":[
                    {"ipAddress":"1.2.3.4","grade":"B"},
                    {"ipAddress":"1.2.3.5","grade":"F"}]}"#,
            ))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/site"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><title>Example Domain</title></html>"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_home_and_hint_text() {
        let server = MockServer::start().await;
        let app = build_router(test_state(&server.uri()).await);

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/servers"));
        assert!(body.contains("/history"));

        let (status, body) = get(app, "/servers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, handlers::SERVERS_HINT_TEXT);
    }

    #[tokio::test]
    async fn test_assess_then_history() {
        let server = MockServer::start().await;
        mount_ready_scan(&server).await;
        let app = build_router(test_state(&server.uri()).await);

        let (status, body) = get(app.clone(), "/servers/example.com").await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let snapshot: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(snapshot["ssl_grade"], "F");
        assert_eq!(snapshot["previous_ssl_grade"], "unknown");
        assert_eq!(snapshot["servers_changed"], true);
        assert_eq!(snapshot["title"], "Example Domain");
        assert_eq!(snapshot["servers"][0]["owner"], "Example Inc");

        let (status, body) = get(app.clone(), "/history").await;
        assert_eq!(status, StatusCode::OK);
        let index: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(index["items"], serde_json::json!(["example.com"]));

        let (_, body) = get(app.clone(), "/servers/example.com").await;
        let second: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(second["previous_ssl_grade"], "F");
        assert_eq!(second["servers_changed"], false);

        let (status, body) = get(app, "/history/example.com").await;
        assert_eq!(status, StatusCode::OK);
        let history: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(history["domain"], "example.com");
        assert_eq!(history["items"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_invalid_domain_is_unprocessable() {
        let server = MockServer::start().await;
        let app = build_router(test_state(&server.uri()).await);

        let (status, body) = get(app, "/servers/localhost").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let error: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"], "precondition");
    }

    #[tokio::test]
    async fn test_scan_in_progress_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analyze"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"host":"example.com","status":"IN_PROGRESS"}"#),
            )
            .mount(&server)
            .await;
        let state = test_state(&server.uri()).await;
        let store = state.assessor.store().clone();
        let app = build_router(state);

        let (status, body) = get(app, "/servers/example.com").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let error: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"], "scan");
        assert_eq!(store.snapshot_count("example.com").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_closed_store_is_unavailable() {
        let server = MockServer::start().await;
        let state = test_state(&server.uri()).await;
        state.assessor.store().pool().close().await;
        let app = build_router(state);

        let (status, body) = get(app, "/history").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let error: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(error["error"], "persistence");
    }

    #[tokio::test]
    async fn test_unknown_domain_history_is_empty() {
        let server = MockServer::start().await;
        let app = build_router(test_state(&server.uri()).await);

        let (status, body) = get(app, "/history/example.org").await;
        assert_eq!(status, StatusCode::OK);
        let history: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(history["items"], serde_json::json!([]));
    }
}
