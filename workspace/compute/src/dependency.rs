use common::ChartId;

use crate::selection::InputId;

/// Which charts must be recomputed when an input fires.
///
/// Charts absent from every entry never depend on user input and are only
/// built once per session.
pub static DEPENDENCY_TABLE: &[(InputId, &[ChartId])] = &[
    (
        InputId::YearRangeEnd,
        &[ChartId::RegionalDistribution, ChartId::RegionalRevenueTrend],
    ),
    (InputId::YearRangeStart, &[ChartId::RegionalRevenueTrend]),
];

/// Charts depending on any of `inputs`, deduplicated, in dashboard slot order.
pub fn dependents(inputs: &[InputId]) -> Vec<ChartId> {
    let mut charts: Vec<ChartId> = DEPENDENCY_TABLE
        .iter()
        .filter(|(input, _)| inputs.contains(input))
        .flat_map(|(_, charts)| charts.iter().copied())
        .collect();
    charts.sort();
    charts.dedup();
    charts
}

/// Inputs a chart depends on, start before end
pub fn inputs_of(chart: ChartId) -> Vec<InputId> {
    let mut inputs: Vec<InputId> = DEPENDENCY_TABLE
        .iter()
        .filter(|(_, charts)| charts.contains(&chart))
        .map(|(input, _)| *input)
        .collect();
    inputs.sort();
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_input_drives_distribution_and_trend() {
        assert_eq!(
            dependents(&[InputId::YearRangeEnd]),
            vec![ChartId::RegionalDistribution, ChartId::RegionalRevenueTrend]
        );
    }

    #[test]
    fn test_start_input_drives_trend_only() {
        assert_eq!(dependents(&[InputId::YearRangeStart]), vec![ChartId::RegionalRevenueTrend]);
    }

    #[test]
    fn test_both_inputs_are_deduplicated() {
        assert_eq!(
            dependents(&[InputId::YearRangeStart, InputId::YearRangeEnd]),
            vec![ChartId::RegionalDistribution, ChartId::RegionalRevenueTrend]
        );
        assert!(dependents(&[]).is_empty());
    }

    #[test]
    fn test_static_charts_have_no_inputs() {
        for chart in [
            ChartId::TotalRevenueTrend,
            ChartId::BusinessMixEvolution,
            ChartId::NewBusinessGrowth,
            ChartId::BusinessStructure2030,
        ] {
            assert!(inputs_of(chart).is_empty(), "{chart}");
        }
        assert_eq!(inputs_of(ChartId::RegionalDistribution), vec![InputId::YearRangeEnd]);
        assert_eq!(
            inputs_of(ChartId::RegionalRevenueTrend),
            vec![InputId::YearRangeStart, InputId::YearRangeEnd]
        );
    }
}
