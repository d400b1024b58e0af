//! Recipe endpoints: create plus three read-only passthroughs.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{Attachment, Fields, ListParams, Record, RecordList};
use crate::server::{error::ApiError, extract::JsonBody, AppState};

/// Column names on the recipes table.
pub mod columns {
    pub const NAME: &str = "Name";
    pub const PHOTO: &str = "Photo";
    pub const CATEGORY: &str = "Category";
    pub const PREP_TIME: &str = "Prep Time";
    pub const COOK_TIME: &str = "Cook Time";
    pub const TOTAL_TIME: &str = "Total Time";
    pub const INGREDIENTS: &str = "Ingredient List";
    pub const INSTRUCTIONS: &str = "Instructions";
    pub const TAGS: &str = "Tags";
    pub const NOTES: &str = "Notes";
}

const SUMMARY_LIMIT: u32 = 20;

/// Free text that callers send either whole or as a list of lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrLines {
    Text(String),
    Lines(Vec<Value>),
}

impl TextOrLines {
    /// Lines are joined with `\n`; text is passed through unchanged.
    pub fn to_text(&self) -> String {
        match self {
            TextOrLines::Text(text) => text.clone(),
            TextOrLines::Lines(lines) => lines
                .iter()
                .map(|line| match line {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Body of `POST /api/add-recipe`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub name: Option<String>,
    pub photo: Option<Value>,
    pub category: Option<Value>,
    pub prep_time: Option<Value>,
    pub cook_time: Option<Value>,
    pub total_time: Option<Value>,
    pub ingredients_list: Option<TextOrLines>,
    pub instructions: Option<TextOrLines>,
    pub tags: Option<Value>,
    pub notes: Option<String>,
}

impl RecipeInput {
    /// Shape the input into recipe columns, leaving out anything empty.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields
            .set(columns::NAME, self.name.clone())
            .set(columns::CATEGORY, self.category.clone())
            .set(columns::PREP_TIME, self.prep_time.clone())
            .set(columns::COOK_TIME, self.cook_time.clone())
            .set(columns::TOTAL_TIME, self.total_time.clone())
            .set(columns::INGREDIENTS, self.ingredients_list.as_ref().map(TextOrLines::to_text))
            .set(columns::INSTRUCTIONS, self.instructions.as_ref().map(TextOrLines::to_text))
            .set(columns::NOTES, self.notes.clone());

        if let Some(photo) = self.photo_attachment() {
            fields.set_serialized(columns::PHOTO, &[photo]);
        }
        if let Some(tags @ Value::Array(_)) = &self.tags {
            fields.set(columns::TAGS, tags.clone());
        }
        fields
    }

    /// Only absolute `http(s)` URLs become attachments; Airtable fetches them itself.
    fn photo_attachment(&self) -> Option<Attachment> {
        match &self.photo {
            Some(Value::String(url)) if url.starts_with("http") => Some(Attachment { url: url.clone() }),
            _ => None,
        }
    }
}

/// `{id, name}` projection returned by `GET /api/recipes-min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: String,
    pub name: Option<String>,
}

impl From<&Record> for RecipeSummary {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.text(columns::NAME).map(str::to_string),
        }
    }
}

pub async fn add_recipe(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RecipeInput>,
) -> Result<Json<Value>, ApiError> {
    let fields = input.to_fields();
    tracing::info!(
        "Creating recipe {:?} with {} field(s)",
        input.name.as_deref().unwrap_or_default(),
        fields.len()
    );

    let record = state
        .airtable
        .create_record(&state.config.airtable.recipes_table, fields)
        .await
        .map_err(ApiError::bad_request)?;

    tracing::info!("Created recipe {}", record.id);
    Ok(Json(json!({ "success": true, "airtableId": record.id })))
}

/// First recipe exactly as Airtable returned it.
pub async fn recipes_sample(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut list: Value = state
        .airtable
        .list_records(&state.config.airtable.recipes_table, &ListParams::max_records(1))
        .await
        .map_err(ApiError::read_failed)?;

    match list.get_mut("records").and_then(Value::as_array_mut) {
        Some(records) if !records.is_empty() => Ok(Json(records.swap_remove(0))),
        _ => Err(ApiError::Validation("No recipe records found".to_string())),
    }
}

pub async fn recipes_min(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecipeSummary>>, ApiError> {
    let params = ListParams::max_records(SUMMARY_LIMIT).with_field(columns::NAME);
    let list: RecordList = state
        .airtable
        .list_records(&state.config.airtable.recipes_table, &params)
        .await
        .map_err(ApiError::read_failed)?;

    Ok(Json(list.records.iter().map(RecipeSummary::from).collect()))
}

pub async fn recipe_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let record: Value = state
        .airtable
        .get_record(&state.config.airtable.recipes_table, &id, false)
        .await
        .map_err(ApiError::read_failed)?;

    Ok(Json(record))
}
