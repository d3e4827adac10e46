//! Records consumed and produced by the sampling engine
//!
//! - [`InspectionContext`] - plan inputs plus the sample size, tag quantity
//!   and acceptance limits written back by the engine

pub mod context;

pub use context::{ContextError, InspectionContext};
