//! Meal plan endpoints.
//!
//! Creating an entry is the one place this service does more than a single
//! passthrough: required fields are checked locally, the date is normalized to
//! local midnight, and after the write the entry is read back to confirm the
//! recipe link stuck. Airtable has been seen to accept a create and silently
//! drop the linked-record value.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::client::{Fields, ListParams, Record, RecordLink};
use crate::dates;
use crate::server::{error::ApiError, extract::JsonBody, AppState};

/// Column names on the meal plan table. The recipe link column is configured
/// separately because it is usually addressed by field id.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const DATE: &str = "Date";
    pub const MEAL: &str = "Meal";
    pub const RATING: &str = "Ratings";
}

const LIST_LIMIT: u32 = 100;

/// One recipe id or several.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RecipeRef {
    One(String),
    Many(Vec<String>),
}

impl RecipeRef {
    /// Non-empty ids, trimmed, in the order given.
    pub fn ids(&self) -> Vec<&str> {
        let ids: Vec<&str> = match self {
            RecipeRef::One(id) => vec![id.as_str()],
            RecipeRef::Many(ids) => ids.iter().map(String::as_str).collect(),
        };
        ids.into_iter().map(str::trim).filter(|id| !id.is_empty()).collect()
    }

    pub fn links(&self) -> Vec<RecordLink> {
        self.ids()
            .into_iter()
            .map(|id| RecordLink { id: id.to_string() })
            .collect()
    }
}

/// Body of `POST /api/add-mealplan`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPlanInput {
    pub name: Option<String>,
    pub date: Option<String>,
    pub recipe: Option<RecipeRef>,
    pub rating: Option<Value>,
    pub meal: Option<String>,
}

impl MealPlanInput {
    /// Names of required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        let mut missing = vec![];
        if blank(&self.name) {
            missing.push("name");
        }
        if blank(&self.date) {
            missing.push("date");
        }
        if self.recipe.as_ref().map_or(true, |r| r.ids().is_empty()) {
            missing.push("recipe");
        }
        missing
    }

    /// Validate and shape the entry for Airtable, resolving the date in `tz`.
    pub fn to_fields<Tz>(&self, link_field: &str, tz: &Tz) -> Result<Fields, ApiError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ApiError::Validation(format!(
                "Missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let raw_date = self.date.as_deref().unwrap_or_default();
        let date = dates::normalize_date_in(raw_date, tz)
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        let links = self.recipe.as_ref().map(RecipeRef::links).unwrap_or_default();

        let mut fields = Fields::new();
        fields
            .set(columns::NAME, self.name.clone())
            .set(columns::DATE, date)
            .set(columns::MEAL, self.meal.clone())
            .set(columns::RATING, self.rating.clone())
            .set_serialized(link_field, &links);
        Ok(fields)
    }
}

pub async fn add_meal_plan(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<MealPlanInput>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let airtable = &state.config.airtable;
    let fields = input.to_fields(&airtable.recipe_link_field, &Local)?;
    tracing::info!(
        "Creating meal plan {:?} for {:?}",
        input.name.as_deref().unwrap_or_default(),
        fields.get(columns::DATE)
    );

    let records = state
        .airtable
        .create_records(&airtable.meal_plan_table, vec![fields])
        .await
        .map_err(ApiError::forwarded)?;

    let Some(created) = records.into_iter().next() else {
        return Err(ApiError::NoRecords);
    };

    verify_recipe_link(&state, &created.id).await?;

    tracing::info!("Created meal plan {}", created.id);
    Ok((StatusCode::CREATED, Json(json!({ "created": true, "id": created.id }))))
}

/// Read the new entry back and fail if its recipe link came back empty.
async fn verify_recipe_link(state: &AppState, id: &str) -> Result<(), ApiError> {
    let airtable = &state.config.airtable;
    let field = airtable.recipe_link_field.as_str();
    let by_field_id = field.starts_with("fld");

    let stored: Record = state
        .airtable
        .get_record(&airtable.meal_plan_table, id, by_field_id)
        .await
        .map_err(ApiError::forwarded)?;

    if !stored.has_links(field) {
        tracing::error!("Meal plan {} was created without its {} link", id, field);
        return Err(ApiError::LinkMissing {
            id: id.to_string(),
            field: field.to_string(),
        });
    }
    Ok(())
}

pub async fn meal_plans(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let list: Value = state
        .airtable
        .list_records(&state.config.airtable.meal_plan_table, &ListParams::max_records(LIST_LIMIT))
        .await
        .map_err(ApiError::read_failed)?;

    Ok(Json(list))
}
