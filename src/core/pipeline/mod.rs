//! Pipeline orchestration

pub mod orchestrator;

pub use orchestrator::Pipeline;
