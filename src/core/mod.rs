//! Core module - configuration, project layout, logging

pub mod config;
pub mod logging;
pub mod project;

pub use config::Config;
pub use project::{Project, ProjectError};
