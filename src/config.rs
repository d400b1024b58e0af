//! Runtime configuration for the planner backend.
//!
//! Everything here is read once at startup and then handed to the router as an
//! immutable value. Airtable schema names live in the constants below so a
//! renamed table or column is a one-line change.

use anyhow::{Context, Result};

/// Root of the Airtable REST API.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Table holding recipe records.
pub const RECIPES_TABLE: &str = "Recipes";

/// Table holding meal plan entries.
pub const MEAL_PLAN_TABLE: &str = "Meal Plan";

/// Linked-record column on the meal plan table that points at recipes.
///
/// Airtable accepts either the column name or its field id (`fld…`). Field ids
/// survive column renames, so prefer one once the base schema is settled.
pub const RECIPE_LINK_FIELD: &str = "Recipe";

pub const DEFAULT_PORT: u16 = 3000;

/// Settings for the outbound Airtable connection.
#[derive(Debug, Clone)]
pub struct AirtableConfig {
    /// API root, without a trailing slash
    pub api_url: String,
    /// Base identifier (`app…`)
    pub base_id: String,
    /// Personal access token sent as `Bearer` on every call
    pub token: String,
    pub recipes_table: String,
    pub meal_plan_table: String,
    pub recipe_link_field: String,
}

impl AirtableConfig {
    pub fn new(base_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            base_id: base_id.into(),
            token: token.into(),
            recipes_table: RECIPES_TABLE.to_string(),
            meal_plan_table: MEAL_PLAN_TABLE.to_string(),
            recipe_link_field: RECIPE_LINK_FIELD.to_string(),
        }
    }

    /// URL of the base, e.g. `https://api.airtable.com/v0/appXXXX`.
    pub fn base_url(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), self.base_id)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub airtable: AirtableConfig,
    /// Shared secret callers must present as `Authorization: Bearer <secret>`
    pub gate_secret: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("missing required environment variable {}", key))
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };

        let mut airtable = AirtableConfig::new(require("AIRTABLE_BASE_ID")?, require("AIRTABLE_TOKEN")?);
        if let Some(api_url) = get("AIRTABLE_API_URL") {
            airtable.api_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(field) = get("AIRTABLE_RECIPE_LINK_FIELD") {
            airtable.recipe_link_field = field;
        }

        Ok(Self {
            port,
            airtable,
            gate_secret: require("GPT_TOKEN")?,
        })
    }
}
