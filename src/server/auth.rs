//! Inbound authentication gate.
//!
//! The comparison lives behind [`AccessPolicy`] so routes never see how a caller
//! is checked. [`StaticBearer`] is a plain string comparison against one shared
//! secret: it is not constant-time and has no notion of rotation.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::server::{error::ApiError, AppState};

/// Decides whether a request may reach a protected route.
pub trait AccessPolicy: Send + Sync + 'static {
    /// `authorization` is the raw `Authorization` header, if any.
    fn allows(&self, authorization: Option<&str>) -> bool;
}

/// Accepts exactly `Bearer <secret>`.
pub struct StaticBearer {
    expected: String,
}

impl StaticBearer {
    pub fn new(secret: &str) -> Self {
        Self {
            expected: format!("Bearer {}", secret),
        }
    }
}

impl AccessPolicy for StaticBearer {
    fn allows(&self, authorization: Option<&str>) -> bool {
        matches!(authorization, Some(value) if value == self.expected)
    }
}

impl<F> AccessPolicy for F
where
    F: Fn(Option<&str>) -> bool + Send + Sync + 'static,
{
    fn allows(&self, authorization: Option<&str>) -> bool {
        self(authorization)
    }
}

/// Middleware rejecting requests the configured policy does not allow.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if !state.gate.allows(authorization) {
        tracing::warn!(
            "Rejected {} {}: {}",
            request.method(),
            request.uri().path(),
            if authorization.is_some() { "bad token" } else { "no Authorization header" }
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
