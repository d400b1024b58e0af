use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::client::types::error_message;

/// Failure of a single Airtable call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable response: connection refused, DNS, TLS, reset.
    #[error("Failed to reach Airtable: {0}")]
    Transport(#[source] reqwest::Error),

    /// Airtable answered with a non-2xx status.
    #[error("Airtable returned {status}: {body}")]
    Upstream { status: StatusCode, body: Value },

    /// Airtable answered 2xx but the body was not what we expected.
    #[error("Invalid response from Airtable: {0}")]
    Decode(String),
}

impl ClientError {
    /// Upstream status code, when Airtable answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Airtable's error payload, passed through untouched to callers.
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            ClientError::Upstream { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Short message suitable for an `{"error": ..}` response.
    pub fn message(&self) -> String {
        match self {
            ClientError::Upstream { status, body } => {
                error_message(body).unwrap_or_else(|| format!("Airtable returned {}", status))
            }
            other => other.to_string(),
        }
    }
}
