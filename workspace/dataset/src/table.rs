use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

use crate::error::{DatasetError, Result};
use crate::period::Period;

/// Identifiers of the six tables the dashboard is built from.
///
/// The declaration order is the stable listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    /// Regional actuals 2022-2024
    RegionalData,
    /// Regional forecast 2025-2030
    ForecastData,
    /// Automotive, energy and services forecast
    TraditionalBusiness,
    /// Optimus and Robotaxi forecast
    NewBusiness,
    /// Traditional + new business = total revenue
    TotalForecast,
    /// Revenue and share per business type in 2030
    BusinessStructure2030,
}

impl TableName {
    pub const ALL: [TableName; 6] = [
        TableName::RegionalData,
        TableName::ForecastData,
        TableName::TraditionalBusiness,
        TableName::NewBusiness,
        TableName::TotalForecast,
        TableName::BusinessStructure2030,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            TableName::RegionalData => "regional_data",
            TableName::ForecastData => "forecast_data",
            TableName::TraditionalBusiness => "traditional_business",
            TableName::NewBusiness => "new_business",
            TableName::TotalForecast => "total_forecast",
            TableName::BusinessStructure2030 => "business_structure_2030",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableName {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        TableName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DatasetError::NotFound(s.to_string()))
    }
}

/// How the columns of a table are to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableKind {
    /// Every column is a period; columns are strictly increasing.
    PeriodSeries,
    /// Columns are measures (e.g. revenue, share) of a single period.
    Snapshot { period: Period },
}

/// An immutable, rectangular, named dataset of categories x columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    kind: TableKind,
    category_header: String,
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl Table {
    /// Builds a table, enforcing the per-table invariants: rectangular shape,
    /// unique row keys, finite non-negative values and, for period series,
    /// strictly increasing period columns.
    pub fn new(
        name: impl Into<String>,
        kind: TableKind,
        category_header: impl Into<String>,
        rows: Vec<String>,
        columns: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        trace!(table = %name, rows = rows.len(), columns = columns.len(), "Building table");

        if rows.is_empty() || columns.is_empty() {
            return Err(DatasetError::integrity(&name, "table has no rows or no columns"));
        }

        if values.len() != rows.len() {
            return Err(DatasetError::integrity(
                &name,
                format!("{} rows declared but {} value rows given", rows.len(), values.len()),
            ));
        }

        let mut seen = HashSet::new();
        for row in &rows {
            if !seen.insert(row.as_str()) {
                return Err(DatasetError::integrity(&name, format!("duplicate row key '{row}'")));
            }
        }

        for (row, row_values) in rows.iter().zip(&values) {
            if row_values.len() != columns.len() {
                return Err(DatasetError::integrity(
                    &name,
                    format!(
                        "row '{row}' has {} values for {} columns",
                        row_values.len(),
                        columns.len()
                    ),
                ));
            }
            for (column, value) in columns.iter().zip(row_values) {
                if !value.is_finite() || *value < 0.0 {
                    return Err(DatasetError::integrity(
                        &name,
                        format!("value {value} at ('{row}', '{column}') is not a non-negative number"),
                    ));
                }
            }
        }

        if kind == TableKind::PeriodSeries {
            let mut previous: Option<Period> = None;
            for column in &columns {
                let period: Period = column
                    .parse()
                    .map_err(|_| DatasetError::integrity(&name, format!("column '{column}' is not a year")))?;
                if *column != period.label() {
                    return Err(DatasetError::integrity(
                        &name,
                        format!("column '{column}' is not in canonical form '{period}'"),
                    ));
                }
                if let Some(prev) = previous {
                    if period <= prev {
                        return Err(DatasetError::integrity(
                            &name,
                            format!("columns not strictly increasing: '{prev}' followed by '{column}'"),
                        ));
                    }
                }
                previous = Some(period);
            }
        }

        Ok(Self {
            name,
            kind,
            category_header: category_header.into(),
            rows,
            columns,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// Name of the categorical row dimension (e.g. `Region`)
    pub fn category_header(&self) -> &str {
        &self.category_header
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn row_index(&self, category: &str) -> Option<usize> {
        self.rows.iter().position(|r| r == category)
    }

    pub fn value(&self, category: &str, column: &str) -> Option<f64> {
        let row = self.row_index(category)?;
        let col = self.column_index(column)?;
        Some(self.values[row][col])
    }

    /// Values of one row, in column order
    pub fn row_values(&self, category: &str) -> Option<&[f64]> {
        self.row_index(category).map(|row| self.values[row].as_slice())
    }

    /// `(category, value)` pairs of one column, in row order
    pub fn column_values(&self, column: &str) -> Option<Vec<(&str, f64)>> {
        let col = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .zip(&self.values)
                .map(|(row, values)| (row.as_str(), values[col]))
                .collect(),
        )
    }

    /// Columns of a period series, parsed. Empty for snapshots.
    pub fn periods(&self) -> Vec<Period> {
        match self.kind {
            TableKind::PeriodSeries => self.columns.iter().filter_map(|c| c.parse().ok()).collect(),
            TableKind::Snapshot { .. } => Vec::new(),
        }
    }

    /// Joins two period series with identical rows column-wise, `self` first.
    /// The resulting columns must still be strictly increasing.
    pub fn concat_periods(&self, other: &Table, name: impl Into<String>) -> Result<Table> {
        let name = name.into();
        if self.kind != TableKind::PeriodSeries || other.kind != TableKind::PeriodSeries {
            return Err(DatasetError::integrity(&name, "only period series can be joined"));
        }
        if self.rows != other.rows {
            return Err(DatasetError::integrity(
                &name,
                format!("row keys of '{}' and '{}' differ", self.name, other.name),
            ));
        }

        let columns = self.columns.iter().chain(&other.columns).cloned().collect();
        let values = self
            .values
            .iter()
            .zip(&other.values)
            .map(|(left, right)| left.iter().chain(right).copied().collect())
            .collect();

        Table::new(
            name,
            TableKind::PeriodSeries,
            self.category_header.clone(),
            self.rows.clone(),
            columns,
            values,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn series(columns: &[&str], values: Vec<Vec<f64>>) -> Result<Table> {
        Table::new(
            "test",
            TableKind::PeriodSeries,
            "Region",
            strings(&["north", "south"]),
            strings(columns),
            values,
        )
    }

    #[test]
    fn test_table_name_round_trip_and_order() {
        let listed: Vec<&str> = TableName::ALL.iter().map(|n| n.as_str()).collect();
        assert_eq!(
            listed,
            vec![
                "regional_data",
                "forecast_data",
                "traditional_business",
                "new_business",
                "total_forecast",
                "business_structure_2030"
            ]
        );
        assert_eq!("new_business".parse::<TableName>().unwrap(), TableName::NewBusiness);
        assert!(matches!("sales".parse::<TableName>(), Err(DatasetError::NotFound(n)) if n == "sales"));
    }

    #[test]
    fn test_accessors() {
        let table = series(&["2022", "2023"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(table.value("south", "2022"), Some(3.0));
        assert_eq!(table.value("east", "2022"), None);
        assert_eq!(table.row_values("north"), Some(&[1.0, 2.0][..]));
        assert_eq!(table.column_values("2023").unwrap(), vec![("north", 2.0), ("south", 4.0)]);
        assert_eq!(table.periods(), vec![Period::actual(2022), Period::actual(2023)]);
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = series(&["2022", "2023"], vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, DatasetError::DataIntegrity { .. }));
    }

    #[test]
    fn test_rejects_negative_and_nan_values() {
        assert!(series(&["2022"], vec![vec![-1.0], vec![3.0]]).is_err());
        assert!(series(&["2022"], vec![vec![f64::NAN], vec![3.0]]).is_err());
    }

    #[test]
    fn test_rejects_non_increasing_columns() {
        assert!(series(&["2023", "2022"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_err());
        assert!(series(&["2023", "2023E"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_ok());
        assert!(series(&["2023", "2023"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_err());
        assert!(series(&["2023", "share"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_err());
    }

    #[test]
    fn test_rejects_non_canonical_period_labels() {
        for columns in [["2024", "2025e"], ["2024", " 2025E"], ["2024", "2025E "]] {
            let err = series(&columns, vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap_err();
            assert!(err.to_string().contains("canonical"), "{columns:?}: {err}");
        }
        assert!(series(&["2024", "2025E"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_rows() {
        let err = Table::new(
            "dup",
            TableKind::PeriodSeries,
            "Region",
            strings(&["north", "north"]),
            strings(&["2022"]),
            vec![vec![1.0], vec![2.0]],
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate row key"));
    }

    #[test]
    fn test_snapshot_allows_measure_columns() {
        let table = Table::new(
            "snap",
            TableKind::Snapshot { period: Period::estimate(2030) },
            "Business",
            strings(&["a", "b"]),
            strings(&["revenue", "share"]),
            vec![vec![10.0, 50.0], vec![10.0, 50.0]],
        )
        .unwrap();
        assert!(table.periods().is_empty());
    }

    #[test]
    fn test_concat_periods() {
        let left = series(&["2022", "2023"], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let right = series(&["2024"], vec![vec![5.0], vec![6.0]]).unwrap();
        let joined = left.concat_periods(&right, "joined").unwrap();
        assert_eq!(joined.name(), "joined");
        assert_eq!(joined.columns(), &strings(&["2022", "2023", "2024"])[..]);
        assert_eq!(joined.row_values("south"), Some(&[3.0, 4.0, 6.0][..]));

        // overlapping periods break the ordering invariant
        assert!(right.concat_periods(&left, "bad").is_err());
    }
}
