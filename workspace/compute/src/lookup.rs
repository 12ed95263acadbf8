//! Year lookups on period tables.

use common::{CategoryValue, Fallback, YearSelection};
use dataset::{Period, Table};
use tracing::{debug, warn};

use crate::error::{ComputeError, Result};

/// Reads the column matching `year` from `table`.
///
/// An exact label match (`"2024"`) wins; otherwise a column of the same year
/// under the estimate convention (`"2030E"`) is used. Fails with
/// `ColumnNotFound` when neither exists.
pub fn select_by_year(table: &Table, year: i32) -> Result<YearSelection> {
    let exact = year.to_string();
    let column = match table.column_index(&exact) {
        Some(_) => exact,
        None => table
            .periods()
            .into_iter()
            .find(|period| period.year == year)
            .map(|period| period.label())
            .ok_or_else(|| ComputeError::column_not_found(table.name(), exact))?,
    };

    column_selection(table, &column, None)
}

fn column_selection(table: &Table, column: &str, fallback: Option<Fallback>) -> Result<YearSelection> {
    let values = table
        .column_values(column)
        .ok_or_else(|| ComputeError::column_not_found(table.name(), column))?
        .into_iter()
        .map(|(category, value)| CategoryValue {
            category: category.to_string(),
            value,
        })
        .collect();

    Ok(YearSelection {
        table: table.name().to_string(),
        column: column.to_string(),
        values,
        fallback,
    })
}

/// Substitution rule for years a table has no column for.
///
/// The chart must never come up blank for a year inside the selectable
/// domain, so a missing year resolves to the default period and, failing
/// that, to the period closest to the requested year. Every substitution is
/// reported on the returned selection and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub default_period: Period,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            default_period: Period::actual(2024),
        }
    }
}

impl FallbackPolicy {
    pub fn new(default_period: Period) -> Self {
        Self { default_period }
    }

    /// `select_by_year` with the fallback applied on `ColumnNotFound`.
    /// Other errors are passed through.
    pub fn resolve(&self, table: &Table, year: i32) -> Result<YearSelection> {
        match select_by_year(table, year) {
            Ok(selection) => Ok(selection),
            Err(ComputeError::ColumnNotFound { .. }) => self.substitute(table, year),
            Err(err) => Err(err),
        }
    }

    fn substitute(&self, table: &Table, year: i32) -> Result<YearSelection> {
        let default_label = self.default_period.label();
        if table.column_index(&default_label).is_some() {
            warn!(
                table = table.name(),
                requested = year,
                substituted = %default_label,
                "No column for requested year, falling back to default period"
            );
            return column_selection(table, &default_label, Some(Fallback::DefaultPeriod { requested: year }));
        }

        let nearest = table
            .periods()
            .into_iter()
            .min_by_key(|period| (period.year - year).abs())
            .ok_or_else(|| ComputeError::column_not_found(table.name(), year.to_string()))?;

        warn!(
            table = table.name(),
            requested = year,
            substituted = %nearest,
            "No column for requested year or default period, falling back to nearest period"
        );
        debug!(default_period = %default_label, "Default period absent from table");
        column_selection(table, &nearest.label(), Some(Fallback::NearestPeriod { requested: year }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::YEAR_DOMAIN;
    use dataset::{Dataset, TableKind, TableName};
    use proptest::prelude::*;

    #[test]
    fn test_regional_actuals_2024() {
        let dataset = Dataset::builtin().unwrap();
        let selection = select_by_year(dataset.table(TableName::RegionalData), 2024).unwrap();

        let values: Vec<(&str, f64)> = selection
            .values
            .iter()
            .map(|cv| (cv.category.as_str(), cv.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("美国", 438.0),
                ("中国", 250.24),
                ("欧洲", 104.26),
                ("亚太", 62.56),
                ("中东", 20.85),
                ("其他", 101.15),
            ]
        );
        assert_eq!(selection.column, "2024");
        assert!(!selection.is_fallback());
    }

    #[test]
    fn test_estimate_label_matches_year() {
        let dataset = Dataset::builtin().unwrap();
        let selection = select_by_year(dataset.table(TableName::TotalForecast), 2030).unwrap();
        assert_eq!(selection.column, "2030E");
        assert_eq!(selection.get("总收入"), Some(2926.79));
        assert_eq!(selection.get("传统业务"), Some(2426.79));
        assert_eq!(selection.get("新增业务"), Some(500.0));
    }

    #[test]
    fn test_strict_lookup_reports_missing_column() {
        let dataset = Dataset::builtin().unwrap();
        let err = select_by_year(dataset.table(TableName::RegionalData), 2027).unwrap_err();
        assert!(matches!(
            err,
            ComputeError::ColumnNotFound { ref table, ref column } if table == "regional_data" && column == "2027"
        ));
    }

    #[test]
    fn test_fallback_to_default_period() {
        let dataset = Dataset::builtin().unwrap();
        let table = dataset.table(TableName::RegionalData);
        let selection = FallbackPolicy::default().resolve(table, 2027).unwrap();

        assert_eq!(selection.column, "2024");
        assert_eq!(selection.fallback, Some(Fallback::DefaultPeriod { requested: 2027 }));
        assert_eq!(selection.get("美国"), Some(438.0));
    }

    #[test]
    fn test_fallback_to_nearest_when_default_absent() {
        let dataset = Dataset::builtin().unwrap();
        let table = dataset.table(TableName::ForecastData);

        let selection = FallbackPolicy::default().resolve(table, 2022).unwrap();
        assert_eq!(selection.column, "2025");
        assert_eq!(selection.fallback, Some(Fallback::NearestPeriod { requested: 2022 }));
    }

    #[test]
    fn test_snapshot_has_no_year_columns() {
        let dataset = Dataset::builtin().unwrap();
        let table = dataset.table(TableName::BusinessStructure2030);
        assert!(FallbackPolicy::default().resolve(table, 2030).is_err());
    }

    proptest! {
        #[test]
        fn prop_every_domain_year_covers_every_row(
            year in YEAR_DOMAIN,
            table_index in 0usize..6,
        ) {
            let dataset = Dataset::builtin().unwrap();
            let table = dataset.table(TableName::ALL[table_index]);
            prop_assume!(table.kind() == TableKind::PeriodSeries);

            let selection = FallbackPolicy::default().resolve(table, year).unwrap();
            prop_assert_eq!(selection.values.len(), table.row_count());
            for (value, row) in selection.values.iter().zip(table.rows()) {
                prop_assert_eq!(&value.category, row);
            }

            let has_exact = table.periods().iter().any(|p| p.year == year);
            prop_assert_eq!(selection.is_fallback(), !has_exact);
            if !has_exact && table.column_index("2024").is_some() {
                prop_assert_eq!(selection.column.as_str(), "2024");
            }
        }
    }
}
