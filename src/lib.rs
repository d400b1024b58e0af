//! # Food Planner Backend Library
//!
//! A small HTTP backend that lets a trusted caller (typically a chat assistant
//! action) add recipes and meal plan entries to an Airtable base and read them
//! back. It consists of:
//!
//! ## Client Module
//!
//! The [`client`] module talks to the Airtable REST API: record creation,
//! listing and lookup, with typed errors that keep Airtable's own payload.
//!
//! ## Server Module
//!
//! The [`server`] module exposes the JSON endpoints, guarded by a static bearer
//! token, and maps each one onto a single Airtable call.
//!
//! ## Quick Start
//!
//! ```no_run
//! use food_planner::{config::AppConfig, server};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! let app = server::router(server::AppState::new(config));
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dates;
pub mod server;

pub use client::AirtableClient;
pub use config::AppConfig;
pub use server::{router, AppState};
