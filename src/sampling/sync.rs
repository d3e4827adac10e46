//! Keeping an inspection context in step with its derived plan
//!
//! Every change goes through a pure function of `(previous context, change)`
//! that either reports [`SyncOutcome::Unchanged`] or hands back a complete new
//! context. Recomputing with unchanged inputs is always `Unchanged`, so a host
//! event loop that re-runs on every update settles after one pass.
//!
//! Two values belong to the inspector rather than the engine:
//!
//! - `sample_size` follows the plan until it is overridden, which sets
//!   `sample_size_is_manual`. Recomputes never touch a manual sample size.
//! - `tag_quantity` follows `sample_size` while the two hold the same value.
//!   Once set to something else it is left alone.

use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace};

use crate::entities::context::InspectionContext;

use super::level::{same_aql, InspectionLevel};
use super::plan::{derive_plan, SamplingPlan};

/// The fields of a context that feed plan derivation
#[derive(Debug, Clone, Copy)]
pub struct PlanInputs {
    pub lot_size: Option<i64>,
    pub level: InspectionLevel,
    pub major_aql: f64,
    pub minor_aql: f64,
}

impl PartialEq for PlanInputs {
    fn eq(&self, other: &Self) -> bool {
        self.lot_size == other.lot_size
            && self.level == other.level
            && same_aql(self.major_aql, other.major_aql)
            && same_aql(self.minor_aql, other.minor_aql)
    }
}

impl PlanInputs {
    pub fn of(ctx: &InspectionContext) -> Self {
        Self {
            lot_size: ctx.lot_size,
            level: ctx.level,
            major_aql: ctx.major_aql,
            minor_aql: ctx.minor_aql,
        }
    }

    pub fn derive(&self) -> Option<SamplingPlan> {
        self.lot_size
            .and_then(|lot| derive_plan(lot, self.level, self.major_aql, self.minor_aql))
    }
}

/// Result of applying a change to a context
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Nothing observable changed; keep the previous context
    Unchanged,
    /// Replace the previous context with this one
    Updated(InspectionContext),
}

impl SyncOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, SyncOutcome::Updated(_))
    }

    /// The context to keep going forward
    pub fn resolve(self, previous: &InspectionContext) -> InspectionContext {
        match self {
            SyncOutcome::Unchanged => previous.clone(),
            SyncOutcome::Updated(next) => next,
        }
    }

    fn compare(previous: &InspectionContext, next: InspectionContext) -> Self {
        if next == *previous {
            SyncOutcome::Unchanged
        } else {
            SyncOutcome::Updated(next)
        }
    }
}

/// Write a sample size, carrying the tag quantity along while it still tracks.
fn write_sample_size(ctx: &mut InspectionContext, sample_size: Option<u32>) {
    let tag_tracks = ctx.tag_quantity.is_none() || ctx.tag_quantity == ctx.sample_size;
    ctx.sample_size = sample_size;
    if tag_tracks {
        ctx.tag_quantity = sample_size;
    }
}

/// Apply new plan inputs and recompute the plan.
///
/// An invalid lot size clears the plan (and a tracking sample size) rather
/// than leaving the previous plan in place.
pub fn reconcile(previous: &InspectionContext, inputs: &PlanInputs) -> SyncOutcome {
    let plan = inputs.derive();

    let mut next = previous.clone();
    next.lot_size = inputs.lot_size;
    next.level = inputs.level;
    next.major_aql = inputs.major_aql;
    next.minor_aql = inputs.minor_aql;
    next.plan = plan;

    if !next.sample_size_is_manual {
        write_sample_size(&mut next, plan.map(|p| p.sample_size));
    }

    let outcome = SyncOutcome::compare(previous, next);
    match &outcome {
        SyncOutcome::Updated(ctx) => debug!(
            lot_size = ?ctx.lot_size,
            level = %ctx.level,
            code_letter = ?ctx.plan.map(|p| p.code_letter),
            sample_size = ?ctx.sample_size,
            "inspection context updated"
        ),
        SyncOutcome::Unchanged => trace!("inspection context already in sync"),
    }
    outcome
}

/// Recompute the plan from the inputs already stored in the context
pub fn refresh(previous: &InspectionContext) -> SyncOutcome {
    reconcile(previous, &PlanInputs::of(previous))
}

/// Inspector sets the sample size by hand
pub fn override_sample_size(previous: &InspectionContext, sample_size: u32) -> SyncOutcome {
    let mut next = previous.clone();
    next.sample_size_is_manual = true;
    write_sample_size(&mut next, Some(sample_size));
    SyncOutcome::compare(previous, next)
}

/// Drop a manual sample size and follow the derived plan again
pub fn release_sample_size(previous: &InspectionContext) -> SyncOutcome {
    let mut next = previous.clone();
    next.sample_size_is_manual = false;
    let derived = next.plan.map(|p| p.sample_size);
    write_sample_size(&mut next, derived);
    SyncOutcome::compare(previous, next)
}

/// Set the tag print quantity.
///
/// A value equal to the sample size puts the tag quantity back on tracking.
pub fn set_tag_quantity(previous: &InspectionContext, tag_quantity: u32) -> SyncOutcome {
    let mut next = previous.clone();
    next.tag_quantity = Some(tag_quantity);
    SyncOutcome::compare(previous, next)
}

/// Single-writer holder for the current context.
///
/// Readers get an immutable snapshot; writers swap in a whole new context,
/// so a reader never sees a half-applied update.
#[derive(Debug, Default)]
pub struct SyncController {
    current: RwLock<Arc<InspectionContext>>,
}

impl SyncController {
    /// Start from a context, bringing its plan in line with its inputs
    pub fn new(ctx: InspectionContext) -> Self {
        let ctx = refresh(&ctx).resolve(&ctx);
        Self {
            current: RwLock::new(Arc::new(ctx)),
        }
    }

    /// Snapshot of the current context
    pub fn current(&self) -> Arc<InspectionContext> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Currently derived plan, if any
    pub fn plan(&self) -> Option<SamplingPlan> {
        self.current().plan
    }

    pub fn update_inputs(&self, inputs: PlanInputs) -> bool {
        self.apply(|ctx| reconcile(ctx, &inputs))
    }

    pub fn set_lot_size(&self, lot_size: Option<i64>) -> bool {
        self.apply(|ctx| {
            reconcile(
                ctx,
                &PlanInputs {
                    lot_size,
                    ..PlanInputs::of(ctx)
                },
            )
        })
    }

    pub fn set_level(&self, level: InspectionLevel) -> bool {
        self.apply(|ctx| {
            reconcile(
                ctx,
                &PlanInputs {
                    level,
                    ..PlanInputs::of(ctx)
                },
            )
        })
    }

    pub fn set_aqls(&self, major_aql: f64, minor_aql: f64) -> bool {
        self.apply(|ctx| {
            reconcile(
                ctx,
                &PlanInputs {
                    major_aql,
                    minor_aql,
                    ..PlanInputs::of(ctx)
                },
            )
        })
    }

    pub fn override_sample_size(&self, sample_size: u32) -> bool {
        self.apply(|ctx| override_sample_size(ctx, sample_size))
    }

    pub fn release_sample_size(&self) -> bool {
        self.apply(release_sample_size)
    }

    pub fn set_tag_quantity(&self, tag_quantity: u32) -> bool {
        self.apply(|ctx| set_tag_quantity(ctx, tag_quantity))
    }

    /// Run a change under the write lock; returns whether a new context was published
    fn apply<F>(&self, change: F) -> bool
    where
        F: FnOnce(&InspectionContext) -> SyncOutcome,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous: &InspectionContext = &guard;
        match change(previous) {
            SyncOutcome::Unchanged => false,
            SyncOutcome::Updated(next) => {
                *guard = Arc::new(next);
                true
            }
        }
    }
}
