//! CLI command implementations

pub mod convert;
pub mod init;
pub mod run;
pub mod validate;
