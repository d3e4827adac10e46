//! Static single-sampling tables (ISO 2859-1 / ANSI-ASQ Z1.4, normal inspection)
//!
//! Four read-only tables drive every plan:
//!
//! - lot size ranges (inclusive upper bounds, last one unbounded)
//! - code letters per inspection level, aligned with the lot size ranges
//! - sample size per code letter
//! - accept/reject numbers per code letter and AQL
//!
//! All accessors are total: out-of-domain inputs are clamped or resolved to
//! the most conservative entry instead of failing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::level::{Aql, CodeLetter, InspectionLevel};

use CodeLetter::*;

/// Upper bounds of the lot size ranges. The final entry stands in for +inf.
pub const LOT_SIZE_THRESHOLDS: [u64; 15] = [
    8,
    15,
    25,
    50,
    90,
    150,
    280,
    500,
    1_200,
    3_200,
    10_000,
    35_000,
    150_000,
    500_000,
    u64::MAX,
];

const LEVEL_I_LETTERS: [CodeLetter; 15] = [A, A, B, C, C, D, E, F, G, H, J, K, L, M, N];
const LEVEL_II_LETTERS: [CodeLetter; 15] = [A, B, C, D, E, F, G, H, J, K, L, M, N, P, Q];
// R is outside the supported alphabet, so the top range stays at Q.
const LEVEL_III_LETTERS: [CodeLetter; 15] = [B, C, D, E, F, G, H, J, K, L, M, N, P, Q, Q];

/// Sample size used when a code letter has no entry
pub const DEFAULT_SAMPLE_SIZE: u32 = 2;

const SAMPLE_SIZES: [(CodeLetter, u32); 15] = [
    (A, 2),
    (B, 3),
    (C, 5),
    (D, 8),
    (E, 13),
    (F, 20),
    (G, 32),
    (H, 50),
    (J, 80),
    (K, 125),
    (L, 200),
    (M, 315),
    (N, 500),
    (P, 800),
    (Q, 1_250),
];

/// Accept and reject numbers for one severity class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcceptReject {
    /// Maximum defect count that still accepts the lot
    pub ac: u32,
    /// Minimum defect count that rejects the lot
    pub re: u32,
}

impl AcceptReject {
    /// Zero-tolerance plan, used for any unsupported AQL
    pub const STRICTEST: AcceptReject = AcceptReject { ac: 0, re: 1 };

    pub const fn new(ac: u32) -> Self {
        Self { ac, re: ac + 1 }
    }
}

impl std::fmt::Display for AcceptReject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ac, self.re)
    }
}

const fn ar(ac: u32) -> AcceptReject {
    AcceptReject::new(ac)
}

/// Accept/reject rows. Columns follow [`Aql::ALL`]: 0.65, 1.0, 1.5, 2.5, 4.0, 6.5.
///
/// This is a regular diagonal, not a cell-for-cell copy of the printed
/// standard (which uses arrows and per-column shifts). Each column walks the
/// acceptance numbers 0, 1, 2, 3, 5, 7, 10, 14, 21 one code letter per step,
/// with `re = ac + 1`. Column 6.5 starts at B, 4.0 at C, 2.5 at D, 1.5 at E,
/// 1.0 at F and 0.65 at G; letters before the start are `0/1` and the walk
/// holds at 21 once it reaches the end.
const ACCEPTANCE: [(CodeLetter, [AcceptReject; 6]); 15] = [
    (A, [ar(0), ar(0), ar(0), ar(0), ar(0), ar(0)]),
    (B, [ar(0), ar(0), ar(0), ar(0), ar(0), ar(0)]),
    (C, [ar(0), ar(0), ar(0), ar(0), ar(0), ar(1)]),
    (D, [ar(0), ar(0), ar(0), ar(0), ar(1), ar(2)]),
    (E, [ar(0), ar(0), ar(0), ar(1), ar(2), ar(3)]),
    (F, [ar(0), ar(0), ar(1), ar(2), ar(3), ar(5)]),
    (G, [ar(0), ar(1), ar(2), ar(3), ar(5), ar(7)]),
    (H, [ar(1), ar(2), ar(3), ar(5), ar(7), ar(10)]),
    (J, [ar(2), ar(3), ar(5), ar(7), ar(10), ar(14)]),
    (K, [ar(3), ar(5), ar(7), ar(10), ar(14), ar(21)]),
    (L, [ar(5), ar(7), ar(10), ar(14), ar(21), ar(21)]),
    (M, [ar(7), ar(10), ar(14), ar(21), ar(21), ar(21)]),
    (N, [ar(10), ar(14), ar(21), ar(21), ar(21), ar(21)]),
    (P, [ar(14), ar(21), ar(21), ar(21), ar(21), ar(21)]),
    (Q, [ar(21), ar(21), ar(21), ar(21), ar(21), ar(21)]),
];

/// Code letter sequence for an inspection level, aligned with [`LOT_SIZE_THRESHOLDS`]
pub fn letters_for(level: InspectionLevel) -> &'static [CodeLetter; 15] {
    match level {
        InspectionLevel::I => &LEVEL_I_LETTERS,
        InspectionLevel::II => &LEVEL_II_LETTERS,
        InspectionLevel::III => &LEVEL_III_LETTERS,
    }
}

/// Index of the first range whose upper bound is `>= lot_size`.
///
/// Lot sizes above every bound fall into the last range.
pub fn lot_size_index(lot_size: u64) -> usize {
    LOT_SIZE_THRESHOLDS
        .iter()
        .position(|&upper| lot_size <= upper)
        .unwrap_or(LOT_SIZE_THRESHOLDS.len() - 1)
}

/// Code letter for a lot size at the given inspection level
pub fn code_letter_for(level: InspectionLevel, lot_size: u64) -> CodeLetter {
    let letters = letters_for(level);
    let index = lot_size_index(lot_size);
    match letters.get(index) {
        Some(letter) => *letter,
        None => {
            warn!(level = %level, index, "lot size index out of range, clamping to last code letter");
            letters[letters.len() - 1]
        }
    }
}

/// Sample size for a code letter
pub fn sample_size_for(letter: CodeLetter) -> u32 {
    match SAMPLE_SIZES.iter().find(|(l, _)| *l == letter) {
        Some((_, size)) => *size,
        None => {
            warn!(code_letter = %letter, "no sample size entry, using default");
            DEFAULT_SAMPLE_SIZE
        }
    }
}

/// Accept/reject numbers for a code letter and AQL value.
///
/// An AQL outside the supported set resolves to [`AcceptReject::STRICTEST`].
pub fn accept_reject(letter: CodeLetter, aql: f64) -> AcceptReject {
    let Some(aql) = Aql::from_value(aql) else {
        warn!(code_letter = %letter, aql, "unsupported AQL, using zero-tolerance plan");
        return AcceptReject::STRICTEST;
    };
    accept_reject_in(&ACCEPTANCE, letter, aql)
}

fn accept_reject_in(
    rows: &[(CodeLetter, [AcceptReject; 6])],
    letter: CodeLetter,
    aql: Aql,
) -> AcceptReject {
    let row = rows
        .iter()
        .find(|(l, _)| *l == letter)
        .or_else(|| {
            warn!(code_letter = %letter, "no acceptance row, falling back to row A");
            rows.iter().find(|(l, _)| *l == A)
        });

    row.and_then(|(_, cells)| cells.get(aql.column()).copied())
        .unwrap_or(AcceptReject::STRICTEST)
}

/// Read-only view of the sample size table
pub fn sample_sizes() -> impl Iterator<Item = (CodeLetter, u32)> {
    SAMPLE_SIZES.iter().copied()
}

/// Read-only view of the acceptance table
pub fn acceptance_rows() -> impl Iterator<Item = (CodeLetter, [AcceptReject; 6])> {
    ACCEPTANCE.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceptance_follows_documented_diagonal() {
        const STEPS: [u32; 9] = [0, 1, 2, 3, 5, 7, 10, 14, 21];
        let starts = [
            (Aql::P0_65, G),
            (Aql::P1_0, F),
            (Aql::P1_5, E),
            (Aql::P2_5, D),
            (Aql::P4_0, C),
            (Aql::P6_5, B),
        ];
        for (aql, start) in starts {
            for (letter, cells) in ACCEPTANCE {
                let expected = match letter.index().checked_sub(start.index()) {
                    None => 0,
                    Some(step) => STEPS[step.min(STEPS.len() - 1)],
                };
                assert_eq!(cells[aql.column()], ar(expected), "{} at {}", letter, aql);
            }
        }
    }

    #[test]
    fn test_every_letter_has_a_sample_size() {
        for letter in CodeLetter::ALL {
            assert!(
                SAMPLE_SIZES.iter().any(|(l, _)| *l == letter),
                "missing sample size for {}",
                letter
            );
        }
    }

    #[test]
    fn test_every_letter_has_an_acceptance_row() {
        for letter in CodeLetter::ALL {
            assert!(
                ACCEPTANCE.iter().any(|(l, _)| *l == letter),
                "missing acceptance row for {}",
                letter
            );
        }
    }

    #[test]
    fn test_reject_is_accept_plus_one_everywhere() {
        for (letter, cells) in acceptance_rows() {
            for (aql, cell) in Aql::ALL.iter().zip(cells) {
                assert_eq!(cell.re, cell.ac + 1, "{} @ {}", letter, aql);
            }
        }
    }

    #[test]
    fn test_sample_sizes_strictly_increase() {
        let sizes: Vec<u32> = sample_sizes().map(|(_, n)| n).collect();
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(sizes[0], 2);
    }

    #[test]
    fn test_acceptance_non_decreasing_in_letter_and_aql() {
        let rows: Vec<_> = acceptance_rows().collect();
        for pair in rows.windows(2) {
            for col in 0..6 {
                assert!(pair[0].1[col].ac <= pair[1].1[col].ac);
            }
        }
        for (_, cells) in &rows {
            assert!(cells.windows(2).all(|w| w[0].ac <= w[1].ac));
        }
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        for (i, &upper) in LOT_SIZE_THRESHOLDS.iter().enumerate().take(14) {
            assert_eq!(lot_size_index(upper), i, "at threshold {}", upper);
            assert_eq!(lot_size_index(upper + 1), i + 1, "just above {}", upper);
        }
    }

    #[test]
    fn test_boundary_letters_level_ii() {
        for (i, &upper) in LOT_SIZE_THRESHOLDS.iter().enumerate().take(14) {
            assert_eq!(code_letter_for(InspectionLevel::II, upper), LEVEL_II_LETTERS[i]);
            assert_eq!(
                code_letter_for(InspectionLevel::II, upper + 1),
                LEVEL_II_LETTERS[i + 1]
            );
        }
    }

    #[test]
    fn test_lot_size_index_extremes() {
        assert_eq!(lot_size_index(0), 0);
        assert_eq!(lot_size_index(1), 0);
        assert_eq!(lot_size_index(u64::MAX), 14);
    }

    #[test]
    fn test_known_letters() {
        assert_eq!(code_letter_for(InspectionLevel::II, 100), F);
        assert_eq!(code_letter_for(InspectionLevel::II, 10_000), L);
        assert_eq!(code_letter_for(InspectionLevel::II, 5), A);
        assert_eq!(code_letter_for(InspectionLevel::I, 100), D);
        assert_eq!(code_letter_for(InspectionLevel::III, 100), G);
        assert_eq!(code_letter_for(InspectionLevel::III, 1_000_000), Q);
    }

    #[test]
    fn test_level_ordering_per_range() {
        for i in 0..15 {
            assert!(LEVEL_I_LETTERS[i] <= LEVEL_II_LETTERS[i]);
            assert!(LEVEL_II_LETTERS[i] <= LEVEL_III_LETTERS[i]);
        }
    }

    #[test]
    fn test_accept_reject_lookup() {
        assert_eq!(accept_reject(F, 2.5), AcceptReject { ac: 2, re: 3 });
        assert_eq!(accept_reject(F, 4.0), AcceptReject { ac: 3, re: 4 });
        assert_eq!(accept_reject(A, 6.5), AcceptReject::STRICTEST);
    }

    #[test]
    fn test_unsupported_aql_is_strictest() {
        for letter in CodeLetter::ALL {
            assert_eq!(accept_reject(letter, 9.9), AcceptReject::STRICTEST);
            assert_eq!(accept_reject(letter, -1.0), AcceptReject::STRICTEST);
        }
    }

    #[test]
    fn test_missing_row_falls_back_to_row_a() {
        let rows = [(A, [ar(0); 6]), (B, [ar(4); 6])];
        assert_eq!(accept_reject_in(&rows, Q, Aql::P2_5), ar(0));
        assert_eq!(accept_reject_in(&rows, B, Aql::P2_5), ar(4));
        assert_eq!(accept_reject_in(&[], Q, Aql::P2_5), AcceptReject::STRICTEST);
    }
}
