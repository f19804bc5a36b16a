//! BI/dashboard service backends
//!
//! - [`HttpBiService`] - REST client
//! - [`MemoryBiService`] - in-process service for tests

pub mod factory;
pub mod http;
pub mod memory;
pub mod traits;

pub use factory::create_bi_service;
pub use http::HttpBiService;
pub use memory::{BiOperation, MemoryBiService, RecordedGrant};
pub use traits::BiService;
