//! CLI command implementations

pub mod completions;
pub mod config;
pub mod init;
pub mod plan;
pub mod sync;
pub mod tables;
pub mod verdict;
