//! Value types for the sampling tables: inspection level, code letter, AQL

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// General inspection level (rigor of inspection)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum InspectionLevel {
    /// Relaxed inspection, smaller samples
    I,
    /// Normal inspection
    #[default]
    II,
    /// Tight inspection, larger samples
    III,
}

impl InspectionLevel {
    pub const ALL: [InspectionLevel; 3] = [InspectionLevel::I, InspectionLevel::II, InspectionLevel::III];

    pub fn label(&self) -> &'static str {
        match self {
            InspectionLevel::I => "I",
            InspectionLevel::II => "II",
            InspectionLevel::III => "III",
        }
    }
}

impl std::fmt::Display for InspectionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid inspection level: {0}. Use I, II, or III")]
pub struct ParseLevelError(pub String);

impl std::str::FromStr for InspectionLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "I" | "1" => Ok(InspectionLevel::I),
            "II" | "2" => Ok(InspectionLevel::II),
            "III" | "3" => Ok(InspectionLevel::III),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Sample size code letter. `I` and `O` are not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodeLetter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    J,
    K,
    L,
    M,
    N,
    P,
    Q,
}

impl CodeLetter {
    /// Every code letter, in ascending sample size order
    pub const ALL: [CodeLetter; 15] = [
        CodeLetter::A,
        CodeLetter::B,
        CodeLetter::C,
        CodeLetter::D,
        CodeLetter::E,
        CodeLetter::F,
        CodeLetter::G,
        CodeLetter::H,
        CodeLetter::J,
        CodeLetter::K,
        CodeLetter::L,
        CodeLetter::M,
        CodeLetter::N,
        CodeLetter::P,
        CodeLetter::Q,
    ];

    pub fn as_char(&self) -> char {
        match self {
            CodeLetter::A => 'A',
            CodeLetter::B => 'B',
            CodeLetter::C => 'C',
            CodeLetter::D => 'D',
            CodeLetter::E => 'E',
            CodeLetter::F => 'F',
            CodeLetter::G => 'G',
            CodeLetter::H => 'H',
            CodeLetter::J => 'J',
            CodeLetter::K => 'K',
            CodeLetter::L => 'L',
            CodeLetter::M => 'M',
            CodeLetter::N => 'N',
            CodeLetter::P => 'P',
            CodeLetter::Q => 'Q',
        }
    }

    /// Position in the alphabet (A = 0, Q = 14)
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for CodeLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid code letter: {0}. Use A-Q (I and O are not used)")]
pub struct ParseCodeLetterError(pub String);

impl std::str::FromStr for CodeLetter {
    type Err = ParseCodeLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        CodeLetter::ALL
            .into_iter()
            .find(|letter| upper.len() == 1 && upper.starts_with(letter.as_char()))
            .ok_or_else(|| ParseCodeLetterError(s.to_string()))
    }
}

/// Acceptable Quality Level, restricted to the supported discrete set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aql {
    P0_65,
    P1_0,
    P1_5,
    P2_5,
    P4_0,
    P6_5,
}

impl Aql {
    pub const ALL: [Aql; 6] = [Aql::P0_65, Aql::P1_0, Aql::P1_5, Aql::P2_5, Aql::P4_0, Aql::P6_5];

    /// Numeric value in percent defective
    pub fn value(&self) -> f64 {
        match self {
            Aql::P0_65 => 0.65,
            Aql::P1_0 => 1.0,
            Aql::P1_5 => 1.5,
            Aql::P2_5 => 2.5,
            Aql::P4_0 => 4.0,
            Aql::P6_5 => 6.5,
        }
    }

    /// Match a numeric AQL against the supported set.
    ///
    /// Returns `None` for anything outside the set (including NaN).
    pub fn from_value(value: f64) -> Option<Aql> {
        Aql::ALL
            .into_iter()
            .find(|aql| (aql.value() - value).abs() < 1e-9)
    }

    /// Column position in the acceptance table
    pub fn column(&self) -> usize {
        *self as usize
    }
}

/// Equality for stored AQL inputs.
///
/// Identical bit patterns compare equal, so an unsupported NaN read from a
/// file matches itself and recomputing with it settles.
pub fn same_aql(a: f64, b: f64) -> bool {
    a == b || a.to_bits() == b.to_bits()
}

impl std::fmt::Display for Aql {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aql::P0_65 => write!(f, "0.65"),
            other => write!(f, "{:.1}", other.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!("ii".parse::<InspectionLevel>().unwrap(), InspectionLevel::II);
        assert_eq!("3".parse::<InspectionLevel>().unwrap(), InspectionLevel::III);
        assert_eq!(" I ".parse::<InspectionLevel>().unwrap(), InspectionLevel::I);
        assert!("IV".parse::<InspectionLevel>().is_err());
    }

    #[test]
    fn test_level_serialization() {
        let yaml = serde_yml::to_string(&InspectionLevel::III).unwrap();
        assert_eq!(yaml.trim(), "III");
    }

    #[test]
    fn test_code_letter_alphabet_skips_i_and_o() {
        let letters: String = CodeLetter::ALL.iter().map(|l| l.as_char()).collect();
        assert_eq!(letters, "ABCDEFGHJKLMNPQ");
        assert!("I".parse::<CodeLetter>().is_err());
        assert!("O".parse::<CodeLetter>().is_err());
        assert!("AB".parse::<CodeLetter>().is_err());
        assert_eq!("p".parse::<CodeLetter>().unwrap(), CodeLetter::P);
    }

    #[test]
    fn test_code_letter_index_matches_position() {
        for (i, letter) in CodeLetter::ALL.iter().enumerate() {
            assert_eq!(letter.index(), i);
        }
    }

    #[test]
    fn test_aql_from_value() {
        assert_eq!(Aql::from_value(2.5), Some(Aql::P2_5));
        assert_eq!(Aql::from_value(0.65), Some(Aql::P0_65));
        assert_eq!(Aql::from_value(9.9), None);
        assert_eq!(Aql::from_value(f64::NAN), None);
    }

    #[test]
    fn test_aql_display() {
        assert_eq!(Aql::P0_65.to_string(), "0.65");
        assert_eq!(Aql::P4_0.to_string(), "4.0");
    }
}
