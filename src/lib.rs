//! TSP: Tessera Sampling Plans
//!
//! Single sampling plans for lot acceptance inspection following
//! ISO 2859-1 / ANSI-ASQ Z1.4 (normal inspection, general levels I-III).
//!
//! ```
//! use tsp::sampling::{derive_plan, CodeLetter, InspectionLevel};
//!
//! let plan = derive_plan(100, InspectionLevel::II, 2.5, 4.0).unwrap();
//! assert_eq!(plan.code_letter, CodeLetter::F);
//! assert_eq!(plan.sample_size, 20);
//! assert!(derive_plan(0, InspectionLevel::II, 2.5, 4.0).is_none());
//! ```

pub mod cli;
pub mod core;
pub mod entities;
pub mod sampling;
