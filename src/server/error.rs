use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::client::ClientError;

/// Everything a handler can answer with instead of a success body.
///
/// Rendered as `{"error": ...}` JSON.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    /// Airtable's error payload, forwarded verbatim under `error`.
    #[error("Airtable returned {status}")]
    Upstream { status: StatusCode, body: Value },

    #[error("{message}")]
    Local { status: StatusCode, message: String },

    #[error("Airtable returned no records")]
    NoRecords,

    /// The create succeeded but reading the row back shows no recipe link.
    #[error("Recipe link missing")]
    LinkMissing { id: String, field: String },
}

impl ApiError {
    /// Map a client failure to 400, keeping Airtable's body when there is one.
    pub fn bad_request(err: ClientError) -> Self {
        match err.upstream_body() {
            Some(body) => ApiError::Upstream {
                status: StatusCode::BAD_REQUEST,
                body: body.clone(),
            },
            None => ApiError::Local {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
        }
    }

    /// Map a client failure to 400 with just a message, for read endpoints.
    pub fn read_failed(err: ClientError) -> Self {
        ApiError::Local {
            status: StatusCode::BAD_REQUEST,
            message: err.message(),
        }
    }

    /// Forward Airtable's own status and body; 500 when Airtable never answered.
    pub fn forwarded(err: ClientError) -> Self {
        match (err.status(), err.upstream_body()) {
            (Some(status), Some(body)) => ApiError::Upstream {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                body: body.clone(),
            },
            _ => ApiError::Local {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } | ApiError::Local { status, .. } => *status,
            ApiError::NoRecords | ApiError::LinkMissing { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Upstream { body, .. } => json!({ "error": body }),
            ApiError::LinkMissing { id, field } => json!({
                "error": self.to_string(),
                "id": id,
                "field": field,
            }),
            other => json!({ "error": other.to_string() }),
        }
    }
}

/// Malformed or mistyped JSON bodies answer like any other validation failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed with {}", status);
        } else {
            tracing::warn!("Request failed with {}: {}", status, self);
        }

        (status, Json(self.body())).into_response()
    }
}

