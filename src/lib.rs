// Reportflow - JSON report conversion and BI dashboard provisioning
// Copyright (c) 2025 Reportflow Contributors
// Licensed under the MIT License

//! # Reportflow - event-driven report pipeline
//!
//! Reportflow reacts to "object created" storage events. A JSON sales export
//! is converted to CSV and written to the converted location; an object that
//! already is CSV is copied unchanged into the archive location. The stored
//! CSV then becomes the physical source of a BI dataset, which feeds a fixed
//! analysis and dashboard that are created on the first run and updated on
//! every later one. Each run ends with exactly one notification.
//!
//! ## Architecture
//!
//! Reportflow follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Pipeline stages (ingest, routing, transform, provision, notify)
//! - [`adapters`] - External collaborators (object storage, BI service, topic publisher)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reportflow::config::load_config;
//! use reportflow::core::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("reportflow.toml")?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!
//!     let event: serde_json::Value =
//!         serde_json::from_str(&std::fs::read_to_string("event.json")?)?;
//!     let outcome = pipeline.run(&event).await;
//!
//!     println!("{}", serde_json::to_string(&outcome.response())?);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every stage returns [`domain::ReportflowError`]. The first error ends the
//! run; its [`domain::ErrorKind`] is recorded on the outcome and reported in
//! the notification, while the process-level response stays a generic
//! `{"statusCode": 500, "body": "Error"}`.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
