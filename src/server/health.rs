use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

pub const BANNER: &str = "Fite Family Food Planner backend is running!";

/// Liveness check for uptime monitoring. Never touches Airtable.
pub async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "ts": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub async fn banner() -> &'static str {
    BANNER
}
