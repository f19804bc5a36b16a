//! Notification transports
//!
//! - [`HttpPublisher`] - REST publish endpoint
//! - [`LogPublisher`] - structured log event only
//! - [`MemoryPublisher`] - in-process recorder for tests

pub mod factory;
pub mod http;
pub mod log;
pub mod memory;
pub mod traits;

pub use factory::create_publisher;
pub use http::HttpPublisher;
pub use log::LogPublisher;
pub use memory::{MemoryPublisher, PublishedMessage};
pub use traits::{NotificationPublisher, PublishReceipt};
