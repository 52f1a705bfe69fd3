//! Recipe difficulty with an explicit total order.
//!
//! Difficulty is stored as free text so legacy rows with unexpected labels
//! still load. Anything that is not one of the three known labels parses to
//! [`Difficulty::Unknown`], which sorts after every known level.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Hard,
    Unknown,
}

impl Difficulty {
    /// The levels a recipe author may pick, easiest first.
    pub const KNOWN: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Hard,
    ];

    /// Lenient parse used when reading stored rows.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::KNOWN
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(Difficulty::Unknown)
    }

    /// Sort key: lower is easier. Unknown labels rank last.
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Beginner => 0,
            Difficulty::Intermediate => 1,
            Difficulty::Hard => 2,
            Difficulty::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse used for user input: only the known levels are accepted.
impl FromStr for Difficulty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from_label(s) {
            Difficulty::Unknown => Err(CoreError::InvalidArgument(format!(
                "Unknown difficulty '{}'. Expected one of: Beginner, Intermediate, Hard",
                s.trim()
            ))),
            known => Ok(known),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_rank() {
        let mut levels = vec![
            Difficulty::Unknown,
            Difficulty::Hard,
            Difficulty::Beginner,
            Difficulty::Intermediate,
        ];
        levels.sort();
        assert_eq!(
            levels,
            vec![
                Difficulty::Beginner,
                Difficulty::Intermediate,
                Difficulty::Hard,
                Difficulty::Unknown
            ]
        );
        for pair in levels.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(Difficulty::from_label("beginner"), Difficulty::Beginner);
        assert_eq!(Difficulty::from_label("  HARD "), Difficulty::Hard);
        assert_eq!(Difficulty::from_label("Medium"), Difficulty::Unknown);
        assert_eq!(Difficulty::from_label(""), Difficulty::Unknown);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert_eq!(
            "Intermediate".parse::<Difficulty>(),
            Ok(Difficulty::Intermediate)
        );
        assert!(matches!(
            "Expert".parse::<Difficulty>(),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!("Unknown".parse::<Difficulty>().is_err());
    }
}
