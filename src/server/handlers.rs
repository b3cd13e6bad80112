//! HTTP handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::types::{ApiError, AppState};
use crate::domain::normalize_domain;
use crate::models::{DomainSnapshot, HistoryIndex};
use crate::whois::RegistrantLookup;

pub(crate) const HOME_TEXT: &str = "If you want to go to servers info, add /servers to the URL, \
     if you want to go to consult history, add /history to the URL.";

pub(crate) const SERVERS_HINT_TEXT: &str = "add '/' and the domain you want to consult to the URL";

/// Snapshots of one domain, oldest first.
#[derive(Debug, Serialize)]
pub struct DomainHistory {
    pub domain: String,
    pub items: Vec<DomainSnapshot>,
}

pub async fn home_handler() -> &'static str {
    HOME_TEXT
}

pub async fn servers_hint_handler() -> &'static str {
    SERVERS_HINT_TEXT
}

/// Scans `domain`, fetches its page metadata and records a new snapshot.
pub async fn assess_handler<L>(
    State(state): State<AppState<L>>,
    Path(domain): Path<String>,
) -> Result<Response, ApiError>
where
    L: RegistrantLookup + 'static,
{
    let domain = normalize_domain(&domain)?;
    log::info!("Assessing {}", domain);

    let raw_scan = state.scan_client.fetch_report(&domain).await?;
    let page = state.page_fetcher.fetch(&domain).await;
    let snapshot = state.assessor.assess(&domain, &raw_scan, page).await?;

    Ok(pretty_json(&snapshot))
}

/// Distinct assessed domains.
pub async fn history_handler<L>(State(state): State<AppState<L>>) -> Result<Response, ApiError>
where
    L: RegistrantLookup + 'static,
{
    let items = state.assessor.store().list_domains().await?;
    Ok(pretty_json(&HistoryIndex { items }))
}

/// Every stored snapshot of one domain.
pub async fn domain_history_handler<L>(
    State(state): State<AppState<L>>,
    Path(domain): Path<String>,
) -> Result<Response, ApiError>
where
    L: RegistrantLookup + 'static,
{
    let domain = normalize_domain(&domain)?;
    let items = state.assessor.store().domain_history(&domain).await?;
    Ok(pretty_json(&DomainHistory { domain, items }))
}

fn pretty_json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(json) => (StatusCode::OK, [("content-type", "application/json")], json).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to serialize response: {}", e),
        )
            .into_response(),
    }
}
