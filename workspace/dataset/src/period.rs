use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DatasetError;

/// A column label interpreted as a year.
///
/// Actual figures are labelled with the bare year (`"2024"`), estimates carry
/// an `E` suffix (`"2025E"`). Periods order by year first; within the same year
/// the actual figure sorts before the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    pub year: i32,
    pub estimate: bool,
}

impl Period {
    pub const fn actual(year: i32) -> Self {
        Self { year, estimate: false }
    }

    pub const fn estimate(year: i32) -> Self {
        Self { year, estimate: true }
    }

    /// Label as it appears in table columns
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.estimate {
            write!(f, "{}E", self.year)
        } else {
            write!(f, "{}", self.year)
        }
    }
}

impl FromStr for Period {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, estimate) = match trimmed.strip_suffix(['E', 'e']) {
            Some(digits) => (digits, true),
            None => (trimmed, false),
        };

        if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DatasetError::InvalidPeriod(s.to_string()));
        }

        let year = digits
            .parse::<i32>()
            .map_err(|_| DatasetError::InvalidPeriod(s.to_string()))?;

        Ok(Self { year, estimate })
    }
}

impl TryFrom<String> for Period {
    type Error = DatasetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actual_and_estimate_labels() {
        assert_eq!("2024".parse::<Period>().unwrap(), Period::actual(2024));
        assert_eq!("2030E".parse::<Period>().unwrap(), Period::estimate(2030));
        assert_eq!(Period::estimate(2026).to_string(), "2026E");
        assert_eq!(Period::actual(2022).label(), "2022");
    }

    #[test]
    fn test_reject_non_year_labels() {
        for label in ["revenue", "24", "20245", "E", "", "2O24"] {
            assert!(
                matches!(label.parse::<Period>(), Err(DatasetError::InvalidPeriod(_))),
                "label {label:?} should not parse"
            );
        }
    }

    #[test]
    fn test_actual_sorts_before_estimate_of_later_year() {
        assert!(Period::actual(2024) < Period::estimate(2025));
        assert!(Period::actual(2025) < Period::estimate(2025));
        assert!(Period::estimate(2025) < Period::actual(2026));
    }
}
