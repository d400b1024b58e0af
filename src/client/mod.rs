//! # Airtable HTTP Client
//!
//! This module provides the outbound side of the service: a thin client for the
//! Airtable REST API covering the record operations the planner needs.
//!
//! ## Modules
//!
//! - [`auth`] - Personal access token handling
//! - [`client`] - The HTTP client with create, list and get calls
//! - [`error`] - Typed failures distinguishing transport, upstream and decode errors
//! - [`types`] - Record, list and cell value types
//!
//! ## Quick Start
//!
//! ```no_run
//! use food_planner::client::{AirtableClient, ListParams, RecordList};
//! use food_planner::config::AirtableConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = AirtableClient::new(&AirtableConfig::new("appXXXX", "patXXXX"));
//!
//! let recipes: RecordList = client.list_records("Recipes", &ListParams::max_records(5)).await?;
//! println!("Found {} recipes", recipes.records.len());
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod error;
pub mod types;

pub use client::AirtableClient;
pub use error::ClientError;
pub use types::*;
