//! Inspection context - the plan inputs and the values written back from the engine

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sampling::level::{same_aql, InspectionLevel};
use crate::sampling::plan::{AcceptanceLimits, SamplingPlan};

/// Default AQL for major defects
pub const DEFAULT_MAJOR_AQL: f64 = 2.5;

/// Default AQL for minor defects
pub const DEFAULT_MINOR_AQL: f64 = 4.0;

/// Inputs and plan state for one inspection.
///
/// `plan` is replaced as a whole on every recompute, never patched.
/// `sample_size` mirrors the plan unless the inspector overrides it, and
/// `tag_quantity` follows `sample_size` until the two are set apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionContext {
    /// Units in the lot; absent or non-positive means no plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<i64>,

    /// Inspection level
    #[serde(default)]
    pub level: InspectionLevel,

    /// AQL for major defects
    #[serde(default = "default_major_aql")]
    pub major_aql: f64,

    /// AQL for minor defects
    #[serde(default = "default_minor_aql")]
    pub minor_aql: f64,

    /// Most recently derived plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<SamplingPlan>,

    /// Units to inspect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u32>,

    /// Inspector typed the sample size; recomputes leave it alone
    #[serde(default)]
    pub sample_size_is_manual: bool,

    /// Number of tags to print
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_quantity: Option<u32>,
}

fn default_major_aql() -> f64 {
    DEFAULT_MAJOR_AQL
}

fn default_minor_aql() -> f64 {
    DEFAULT_MINOR_AQL
}

impl Default for InspectionContext {
    fn default() -> Self {
        Self {
            lot_size: None,
            level: InspectionLevel::default(),
            major_aql: DEFAULT_MAJOR_AQL,
            minor_aql: DEFAULT_MINOR_AQL,
            plan: None,
            sample_size: None,
            sample_size_is_manual: false,
            tag_quantity: None,
        }
    }
}

impl PartialEq for InspectionContext {
    fn eq(&self, other: &Self) -> bool {
        let Self {
            lot_size,
            level,
            major_aql,
            minor_aql,
            plan,
            sample_size,
            sample_size_is_manual,
            tag_quantity,
        } = self;

        *lot_size == other.lot_size
            && *level == other.level
            && same_aql(*major_aql, other.major_aql)
            && same_aql(*minor_aql, other.minor_aql)
            && *plan == other.plan
            && *sample_size == other.sample_size
            && *sample_size_is_manual == other.sample_size_is_manual
            && *tag_quantity == other.tag_quantity
    }
}

impl InspectionContext {
    /// Accept/reject numbers written back from the current plan
    pub fn acceptance_limits(&self) -> Option<AcceptanceLimits> {
        self.plan.map(|p| p.acceptance_limits())
    }

    /// Load a context from a YAML file
    pub fn load(path: &Path) -> Result<Self, ContextError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ContextError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yml::from_str(&contents).map_err(|e| ContextError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a context, or start from defaults if the file does not exist yet
    pub fn load_or_default(path: &Path) -> Result<Self, ContextError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the context as YAML
    pub fn save(&self, path: &Path) -> Result<(), ContextError> {
        let yaml = serde_yml::to_string(self).map_err(|e| ContextError::Serialize(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ContextError::Write {
                path: parent.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(path, yaml).map_err(|e| ContextError::Write {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Errors reading or writing a context file
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Invalid inspection context in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize inspection context: {0}")]
    Serialize(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}
