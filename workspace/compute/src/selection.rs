use common::YearRange;
use std::ops::RangeInclusive;

use crate::error::{ComputeError, Result};

/// Years the range control can select
pub const YEAR_DOMAIN: RangeInclusive<i32> = 2022..=2030;

/// Input controls the dashboard reacts to.
///
/// The year-range slider exposes its two endpoints as separate inputs so that
/// charts can depend on one endpoint only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputId {
    YearRangeStart,
    YearRangeEnd,
}

impl InputId {
    pub const ALL: [InputId; 2] = [InputId::YearRangeStart, InputId::YearRangeEnd];

    pub const fn as_str(&self) -> &'static str {
        match self {
            InputId::YearRangeStart => "year-range.start",
            InputId::YearRangeEnd => "year-range.end",
        }
    }
}

/// The current year range of one session.
///
/// Always satisfies `start <= end` with both ends inside [`YEAR_DOMAIN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    start: i32,
    end: i32,
}

impl SelectionState {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if !YEAR_DOMAIN.contains(&start) || !YEAR_DOMAIN.contains(&end) {
            return Err(ComputeError::InvalidSelection(format!(
                "years must lie within {}..={}, got [{start}, {end}]",
                YEAR_DOMAIN.start(),
                YEAR_DOMAIN.end()
            )));
        }
        if start > end {
            return Err(ComputeError::InvalidSelection(format!(
                "start year {start} is after end year {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Inputs whose value differs between `self` and `next`.
    pub fn changed_inputs(&self, next: &SelectionState) -> Vec<InputId> {
        let mut changed = Vec::new();
        if self.start != next.start {
            changed.push(InputId::YearRangeStart);
        }
        if self.end != next.end {
            changed.push(InputId::YearRangeEnd);
        }
        changed
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            start: *YEAR_DOMAIN.start(),
            end: *YEAR_DOMAIN.end(),
        }
    }
}

impl From<SelectionState> for YearRange {
    fn from(state: SelectionState) -> Self {
        YearRange {
            start_year: state.start,
            end_year: state.end,
        }
    }
}

impl TryFrom<YearRange> for SelectionState {
    type Error = ComputeError;

    fn try_from(range: YearRange) -> Result<Self> {
        SelectionState::new(range.start_year, range.end_year)
    }
}

/// The one inbound interaction event: the user moved the year-range slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRangeChanged {
    pub start_year: i32,
    pub end_year: i32,
}

impl YearRangeChanged {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        Self { start_year, end_year }
    }

    /// Validates the event into a selection; reversed ranges are rejected, never swapped.
    pub fn to_selection(&self) -> Result<SelectionState> {
        SelectionState::new(self.start_year, self.end_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_whole_domain() {
        let state = SelectionState::default();
        assert_eq!((state.start(), state.end()), (2022, 2030));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = YearRangeChanged::new(2030, 2022).to_selection().unwrap_err();
        assert!(matches!(err, ComputeError::InvalidSelection(_)));
        assert!(err.to_string().contains("after end year"));
    }

    #[test]
    fn test_out_of_domain_is_rejected() {
        assert!(SelectionState::new(2021, 2025).is_err());
        assert!(SelectionState::new(2025, 2031).is_err());
        assert!(SelectionState::new(2025, 2025).is_ok());
    }

    #[test]
    fn test_changed_inputs() {
        let state = SelectionState::default();
        let next = SelectionState::new(2022, 2027).unwrap();
        assert_eq!(state.changed_inputs(&next), vec![InputId::YearRangeEnd]);

        let next = SelectionState::new(2024, 2026).unwrap();
        assert_eq!(
            state.changed_inputs(&next),
            vec![InputId::YearRangeStart, InputId::YearRangeEnd]
        );
        assert!(state.changed_inputs(&state).is_empty());
    }

    #[test]
    fn test_year_range_conversion() {
        let state = SelectionState::new(2023, 2028).unwrap();
        let range = YearRange::from(state);
        assert_eq!(range, YearRange { start_year: 2023, end_year: 2028 });
        assert_eq!(SelectionState::try_from(range).unwrap(), state);
        assert!(SelectionState::try_from(YearRange { start_year: 2029, end_year: 2023 }).is_err());
    }
}
