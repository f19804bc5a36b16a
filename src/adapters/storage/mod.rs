//! Object storage backends
//!
//! - [`FilesystemStore`] - locations are directories under a root
//! - [`HttpStore`] - REST object service
//! - [`MemoryStore`] - in-process map for tests and dry runs

pub mod factory;
pub mod filesystem;
pub mod http;
pub mod memory;
pub mod traits;

pub use factory::create_artifact_store;
pub use filesystem::FilesystemStore;
pub use http::HttpStore;
pub use memory::MemoryStore;
pub use traits::ArtifactStore;
