//! Mapping of domain errors onto HTTP responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use expensa_core::ledger::LedgerError;
use expensa_shared::AppError;

/// Error returned by handlers.
///
/// Every body has the shape `{ "error": CODE, "message": text }`;
/// validation failures add a `violations` array with one entry per field.
#[derive(Debug)]
pub enum ApiError {
    /// A ledger or directory operation failed.
    Ledger(LedgerError),
    /// An application-level failure outside the ledger.
    App(AppError),
    /// The request body is not the JSON the handler expects.
    Body(JsonRejection),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, violations) = match &self {
            Self::Ledger(err) => {
                let violations: Vec<_> = err
                    .violations()
                    .iter()
                    .map(|v| {
                        json!({
                            "field": v.field(),
                            "code": v.code(),
                            "message": v.to_string(),
                        })
                    })
                    .collect();
                (err.status_code(), err.error_code(), err.to_string(), violations)
            }
            Self::App(err) => (err.status_code(), err.error_code(), err.to_string(), Vec::new()),
            Self::Body(rejection) => (
                rejection.status().as_u16(),
                "INVALID_BODY",
                rejection.body_text(),
                Vec::new(),
            ),
        };

        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %message, "Request failed");
        }

        let body = if violations.is_empty() {
            json!({ "error": code, "message": message })
        } else {
            json!({ "error": code, "message": message, "violations": violations })
        };
        (status, Json(body)).into_response()
    }
}
