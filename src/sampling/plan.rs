//! Single sampling plan derivation
//!
//! Chains the three table lookups:
//! lot size + level -> code letter -> sample size, then
//! code letter + AQL -> accept/reject for each severity class.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::level::{CodeLetter, InspectionLevel};
use super::tables::{self, AcceptReject};

/// Accept/reject numbers for both severity classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceptanceLimits {
    pub major: AcceptReject,
    pub minor: AcceptReject,
}

/// A derived single sampling plan.
///
/// Plans are plain values: a new one is derived whenever the inputs change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SamplingPlan {
    /// Number of units to draw from the lot
    pub sample_size: u32,

    /// Code letter the plan was read from
    pub code_letter: CodeLetter,

    /// Limits for major defects
    pub major: AcceptReject,

    /// Limits for minor defects
    pub minor: AcceptReject,
}

impl SamplingPlan {
    pub fn acceptance_limits(&self) -> AcceptanceLimits {
        AcceptanceLimits {
            major: self.major,
            minor: self.minor,
        }
    }

    /// Decide a lot from the defect counts found in the sample.
    ///
    /// The lot is accepted only if both severity classes accept.
    pub fn disposition(&self, major_defects: u32, minor_defects: u32) -> LotDisposition {
        let major = Verdict::of(self.major, major_defects);
        let minor = Verdict::of(self.minor, minor_defects);
        LotDisposition {
            major,
            minor,
            lot: if major == Verdict::Accept && minor == Verdict::Accept {
                Verdict::Accept
            } else {
                Verdict::Reject
            },
        }
    }

    /// One-line summary, e.g. `F n=20 major 2/3 minor 3/4`
    pub fn summary(&self) -> String {
        format!(
            "{} n={} major {} minor {}",
            self.code_letter, self.sample_size, self.major, self.minor
        )
    }
}

/// Accept or reject outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    fn of(limits: AcceptReject, defects: u32) -> Self {
        if defects >= limits.re {
            Verdict::Reject
        } else {
            Verdict::Accept
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accept => write!(f, "accept"),
            Verdict::Reject => write!(f, "reject"),
        }
    }
}

/// Outcome per severity class and for the lot as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotDisposition {
    pub major: Verdict,
    pub minor: Verdict,
    pub lot: Verdict,
}

/// Derive the sampling plan for a lot.
///
/// Returns `None` when the lot size is zero or negative: there is not
/// enough information to pick a plan yet. AQL values outside the supported
/// set resolve to the zero-tolerance plan `0/1`.
pub fn derive_plan(
    lot_size: i64,
    level: InspectionLevel,
    major_aql: f64,
    minor_aql: f64,
) -> Option<SamplingPlan> {
    let lot_size = u64::try_from(lot_size).ok().filter(|&n| n > 0)?;

    let code_letter = tables::code_letter_for(level, lot_size);
    let plan = SamplingPlan {
        sample_size: tables::sample_size_for(code_letter),
        code_letter,
        major: tables::accept_reject(code_letter, major_aql),
        minor: tables::accept_reject(code_letter, minor_aql),
    };

    debug!(lot_size, level = %level, code_letter = %code_letter, sample_size = plan.sample_size, "derived sampling plan");
    Some(plan)
}

/// Parse a free-form lot size entry.
///
/// Whole numbers may be written as integers (`1_200`) or as integral
/// decimals (`100.0`, `1e3`). Blank, fractional or non-numeric text yields
/// `None`, the same as an absent lot size.
pub fn parse_lot_size(input: &str) -> Option<i64> {
    let cleaned = input.trim().replace('_', "");
    if let Ok(n) = cleaned.parse::<i64>() {
        return Some(n);
    }

    let value = cleaned.parse::<f64>().ok()?;
    let whole = value.is_finite() && value.fract() == 0.0;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    (whole && value >= i64::MIN as f64 && value < i64::MAX as f64).then(|| value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::sampling::level::Aql;

    fn plan(lot: i64, level: InspectionLevel, major: f64, minor: f64) -> SamplingPlan {
        derive_plan(lot, level, major, minor).expect("plan for positive lot size")
    }

    #[test]
    fn test_lot_100_level_ii() {
        let p = plan(100, InspectionLevel::II, 2.5, 4.0);
        assert_eq!(p.code_letter, CodeLetter::F);
        assert_eq!(p.sample_size, 20);
        assert_eq!(p.major, AcceptReject { ac: 2, re: 3 });
        assert_eq!(p.minor, AcceptReject { ac: 3, re: 4 });
    }

    #[test]
    fn test_lot_10000_level_ii() {
        let p = plan(10_000, InspectionLevel::II, 2.5, 4.0);
        assert_eq!(p.code_letter, CodeLetter::L);
        assert_eq!(p.sample_size, 200);
    }

    #[test]
    fn test_small_lot() {
        let p = plan(5, InspectionLevel::II, 2.5, 4.0);
        assert_eq!(p.code_letter, CodeLetter::A);
        assert_eq!(p.sample_size, 2);
    }

    #[test]
    fn test_level_iii_samples_more_than_level_i() {
        let relaxed = plan(100, InspectionLevel::I, 1.0, 2.5);
        let tight = plan(100, InspectionLevel::III, 1.0, 2.5);
        assert!(tight.sample_size >= relaxed.sample_size);
    }

    #[test]
    fn test_non_positive_lot_size_has_no_plan() {
        for lot in [0, -5, i64::MIN] {
            for level in InspectionLevel::ALL {
                assert_eq!(derive_plan(lot, level, 2.5, 4.0), None);
            }
        }
    }

    #[test]
    fn test_unsupported_aql_falls_back_to_zero_tolerance() {
        let p = plan(10_000, InspectionLevel::II, 9.9, 4.0);
        assert_eq!(p.major, AcceptReject::STRICTEST);
        assert_eq!(p.minor, AcceptReject { ac: 21, re: 22 });
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_plan(4_321, InspectionLevel::III, 0.65, 6.5);
        let b = derive_plan(4_321, InspectionLevel::III, 0.65, 6.5);
        assert_eq!(a, b);
    }

    #[test]
    fn test_disposition() {
        let p = plan(100, InspectionLevel::II, 2.5, 4.0);

        let d = p.disposition(2, 3);
        assert_eq!(d.lot, Verdict::Accept);

        let d = p.disposition(3, 0);
        assert_eq!(d.major, Verdict::Reject);
        assert_eq!(d.minor, Verdict::Accept);
        assert_eq!(d.lot, Verdict::Reject);

        let d = p.disposition(0, 4);
        assert_eq!(d.minor, Verdict::Reject);
        assert_eq!(d.lot, Verdict::Reject);
    }

    #[test]
    fn test_summary_snapshot() {
        let p = plan(100, InspectionLevel::II, 2.5, 4.0);
        insta::assert_snapshot!(p.summary(), @"F n=20 major 2/3 minor 3/4");
    }

    #[test]
    fn test_parse_lot_size() {
        assert_eq!(parse_lot_size(" 1_200 "), Some(1200));
        assert_eq!(parse_lot_size("-5"), Some(-5));
        assert_eq!(parse_lot_size(""), None);
        assert_eq!(parse_lot_size("lots"), None);
    }

    #[test]
    fn test_parse_lot_size_integral_decimals() {
        assert_eq!(parse_lot_size("100.0"), Some(100));
        assert_eq!(parse_lot_size("1e3"), Some(1000));
        assert_eq!(parse_lot_size("-2.0"), Some(-2));
        assert_eq!(parse_lot_size("12.5"), None);
        assert_eq!(parse_lot_size("inf"), None);
        assert_eq!(parse_lot_size("NaN"), None);
        assert_eq!(parse_lot_size("1e30"), None);
    }

    fn any_level() -> impl Strategy<Value = InspectionLevel> {
        prop::sample::select(InspectionLevel::ALL.to_vec())
    }

    fn any_aql() -> impl Strategy<Value = f64> {
        prop::sample::select(Aql::ALL.iter().map(|a| a.value()).collect::<Vec<_>>())
    }

    proptest! {
        #[test]
        fn code_letter_non_decreasing_in_lot_size(a in 1i64..2_000_000, b in 1i64..2_000_000, level in any_level()) {
            let (small, large) = if a <= b { (a, b) } else { (b, a) };
            let p_small = derive_plan(small, level, 2.5, 4.0).unwrap();
            let p_large = derive_plan(large, level, 2.5, 4.0).unwrap();
            prop_assert!(p_small.code_letter <= p_large.code_letter);
            prop_assert!(p_small.sample_size <= p_large.sample_size);
        }

        #[test]
        fn code_letter_non_decreasing_in_level(lot in 1i64..2_000_000) {
            let i = derive_plan(lot, InspectionLevel::I, 2.5, 4.0).unwrap();
            let ii = derive_plan(lot, InspectionLevel::II, 2.5, 4.0).unwrap();
            let iii = derive_plan(lot, InspectionLevel::III, 2.5, 4.0).unwrap();
            prop_assert!(i.code_letter.index() <= ii.code_letter.index());
            prop_assert!(ii.code_letter.index() <= iii.code_letter.index());
        }

        #[test]
        fn plans_respect_result_guarantees(lot in 1i64..i64::MAX, level in any_level(), major in any_aql(), minor in any_aql()) {
            let p = derive_plan(lot, level, major, minor).unwrap();
            prop_assert!(p.sample_size >= 2);
            prop_assert_eq!(p.major.re, p.major.ac + 1);
            prop_assert_eq!(p.minor.re, p.minor.ac + 1);
        }
    }
}
