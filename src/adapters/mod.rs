//! External system integrations for Reportflow.
//!
//! Each collaborator the pipeline talks to sits behind an `async_trait`
//! trait with a factory selecting the implementation from configuration:
//!
//! - [`storage`] - object storage ([`ArtifactStore`](storage::ArtifactStore))
//! - [`bi`] - BI/dashboard service ([`BiService`](bi::BiService))
//! - [`notification`] - topic publishing
//!   ([`NotificationPublisher`](notification::NotificationPublisher))
//!
//! Every trait has an in-memory implementation used by the test suite.
//!
//! ```rust,no_run
//! use reportflow::adapters::storage::create_artifact_store;
//! use reportflow::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("reportflow.toml")?;
//! let store = create_artifact_store(&config.storage)?;
//! println!("using {} storage", store.backend_name());
//! # Ok(())
//! # }
//! ```

pub mod bi;
pub(crate) mod http_client;
pub mod notification;
pub mod storage;
