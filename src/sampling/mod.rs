//! Single sampling plan engine
//!
//! - [`tables`] - static lookup tables and total accessors
//! - [`plan`] - plan derivation from lot size, level and AQLs
//! - [`sync`] - keeping an inspection context in step with its plan

pub mod level;
pub mod plan;
pub mod sync;
pub mod tables;

pub use level::{Aql, CodeLetter, InspectionLevel};
pub use plan::{derive_plan, AcceptanceLimits, LotDisposition, SamplingPlan, Verdict};
pub use sync::{reconcile, PlanInputs, SyncController, SyncOutcome};
pub use tables::AcceptReject;
