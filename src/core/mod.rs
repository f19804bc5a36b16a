//! Core business logic for Reportflow.
//!
//! # Modules
//!
//! - [`ingest`] - Event adapter (trigger payload to request)
//! - [`transform`] - JSON to CSV conversion
//! - [`routing`] - Destination keys and pass-through handling
//! - [`provision`] - BI dataset, analysis and dashboard provisioning
//! - [`notify`] - Completion notification
//! - [`pipeline`] - Orchestration of one run
//!
//! # Run Workflow
//!
//! 1. **Parse**: Normalize the storage event into an `IngestionRequest`
//! 2. **Read**: Fetch the source object
//! 3. **Transform**: Convert `.json` sources to CSV (`.csv` is forwarded)
//! 4. **Write**: Store the artifact under its deterministic destination key
//! 5. **Provision**: Upsert the dataset, refresh analysis and dashboard, grant access
//! 6. **Notify**: Publish the outcome, best effort
//!
//! # Example
//!
//! ```rust,no_run
//! use reportflow::config::load_config;
//! use reportflow::core::pipeline::Pipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("reportflow.toml")?;
//! let pipeline = Pipeline::from_config(&config)?;
//!
//! let event = serde_json::json!({
//!     "Records": [{ "s3": { "bucket": { "name": "incoming" }, "object": { "key": "sales.json" } } }]
//! });
//! let outcome = pipeline.run(&event).await;
//! assert_eq!(outcome.response().status_code, 200);
//! # Ok(())
//! # }
//! ```

pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod provision;
pub mod routing;
pub mod transform;
