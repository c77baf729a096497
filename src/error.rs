use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for dashboard API responses.
#[derive(Debug)]
pub enum DashError {
    Db(String),
    Market(String),
    BadRequest(String),
    Internal(String),
}

impl std::fmt::Display for DashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(msg) => write!(f, "db_error: {msg}"),
            Self::Market(msg) => write!(f, "market_error: {msg}"),
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::Internal(msg) => write!(f, "internal_error: {msg}"),
        }
    }
}

impl std::error::Error for DashError {}

impl IntoResponse for DashError {
    fn into_response(self) -> Response {
        let (status, error_str) = match &self {
            Self::Db(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("db_error:{msg}")),
            Self::Market(msg) => (StatusCode::BAD_GATEWAY, format!("market_error:{msg}")),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = json!({ "error": error_str });
        (status, axum::Json(body)).into_response()
    }
}

impl From<rusqlite::Error> for DashError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Db(e.to_string())
    }
}

impl From<reqwest::Error> for DashError {
    fn from(e: reqwest::Error) -> Self {
        Self::Market(e.to_string())
    }
}

impl From<serde_json::Error> for DashError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<std::io::Error> for DashError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}
