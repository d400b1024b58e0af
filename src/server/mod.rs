//! # HTTP Surface
//!
//! axum router exposing the planner endpoints. Every protected route goes through
//! the [`auth`] gate before reaching its handler; handlers translate the request
//! into a single Airtable call and reshape the answer.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | [`health::banner`] |
//! | `GET /api/health` | [`health::health`] |
//! | `POST /api/add-recipe` | [`recipes::add_recipe`] |
//! | `GET /api/recipes-sample` | [`recipes::recipes_sample`] |
//! | `GET /api/recipes-min` | [`recipes::recipes_min`] |
//! | `GET /api/recipes/{id}` | [`recipes::recipe_by_id`] |
//! | `POST /api/add-mealplan` | [`meal_plans::add_meal_plan`] |
//! | `GET /api/mealplans` | [`meal_plans::meal_plans`] |

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::client::AirtableClient;
use crate::config::AppConfig;

pub mod auth;
pub mod error;
pub mod extract;
pub mod health;
pub mod meal_plans;
pub mod recipes;

pub use auth::{AccessPolicy, StaticBearer};
pub use error::ApiError;
pub use extract::JsonBody;

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub airtable: AirtableClient,
    pub gate: Arc<dyn AccessPolicy>,
}

impl AppState {
    /// State with the default static bearer gate built from `config.gate_secret`.
    pub fn new(config: AppConfig) -> Self {
        let airtable = AirtableClient::new(&config.airtable);
        let gate = Arc::new(StaticBearer::new(&config.gate_secret));
        Self {
            config: Arc::new(config),
            airtable,
            gate,
        }
    }

    /// Replace the gate, e.g. with a constant-time or rotating-token policy.
    pub fn with_gate(mut self, gate: impl AccessPolicy) -> Self {
        self.gate = Arc::new(gate);
        self
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/add-recipe", post(recipes::add_recipe))
        .route("/api/recipes-sample", get(recipes::recipes_sample))
        .route("/api/recipes-min", get(recipes::recipes_min))
        .route("/api/recipes/{id}", get(recipes::recipe_by_id))
        .route("/api/add-mealplan", post(meal_plans::add_meal_plan))
        .route("/api/mealplans", get(meal_plans::meal_plans))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    Router::new()
        .route("/", get(health::banner))
        .route("/api/health", get(health::health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
