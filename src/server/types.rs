//! Server state and error responses.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::error_handling::{AssessmentError, DatabaseError, PreconditionError};
use crate::page::PageFetcher;
use crate::pipeline::Assessor;
use crate::scan::{ScanClient, ScanClientError};

/// Shared state of the HTTP server.
pub struct AppState<L> {
    pub assessor: Arc<Assessor<L>>,
    pub scan_client: ScanClient,
    pub page_fetcher: PageFetcher,
}

impl<L> AppState<L> {
    pub fn new(assessor: Assessor<L>, scan_client: ScanClient, page_fetcher: PageFetcher) -> Self {
        Self {
            assessor: Arc::new(assessor),
            scan_client,
            page_fetcher,
        }
    }
}

// Manual impl: `L` itself does not need to be `Clone`
impl<L> Clone for AppState<L> {
    fn clone(&self) -> Self {
        Self {
            assessor: Arc::clone(&self.assessor),
            scan_client: self.scan_client.clone(),
            page_fetcher: self.page_fetcher.clone(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// `precondition`, `persistence` or `scan`
    pub error: &'static str,
    pub message: String,
}

/// Failures a handler can report.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error(transparent)]
    Scan(#[from] ScanClientError),
}

impl From<PreconditionError> for ApiError {
    fn from(e: PreconditionError) -> Self {
        ApiError::Assessment(e.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(e: DatabaseError) -> Self {
        ApiError::Assessment(e.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Assessment(AssessmentError::Precondition(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Assessment(AssessmentError::Persistence(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Scan(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Assessment(e) => e.kind().as_str(),
            ApiError::Scan(_) => "scan",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("Rejected request: {}", self);
        }
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let precondition: ApiError = PreconditionError::MalformedScan("empty".to_string()).into();
        assert_eq!(precondition.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(precondition.kind(), "precondition");

        let persistence: ApiError =
            DatabaseError::FileCreationError("read-only".to_string()).into();
        assert_eq!(persistence.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(persistence.kind(), "persistence");

        let scan: ApiError = ScanClientError::Status(529).into();
        assert_eq!(scan.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(scan.kind(), "scan");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "precondition",
            message: "scan is not final".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "precondition");
        assert_eq!(json["message"], "scan is not final");
    }
}
