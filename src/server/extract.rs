use axum::extract::FromRequest;

use crate::server::error::ApiError;

/// `axum::Json` whose rejections (bad syntax, wrong types, missing
/// `Content-Type`) answer 400 `{"error": ...}` like every other bad input.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
