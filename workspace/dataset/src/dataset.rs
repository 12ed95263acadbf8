use std::path::Path;
use tracing::{debug, info, instrument, trace};

use crate::constants::{
    SNAPSHOT_REVENUE, SNAPSHOT_SHARE, TOTAL_NEW_BUSINESS, TOTAL_REVENUE, TOTAL_TRADITIONAL,
    builtin_tables,
};
use crate::error::{DatasetError, Result};
use crate::source::DatasetSource;
use crate::table::{Table, TableKind, TableName};

/// Absolute tolerance for revenue identities
pub const ABSOLUTE_TOLERANCE: f64 = 1e-6;
/// Relative tolerance for revenue identities
pub const RELATIVE_TOLERANCE: f64 = 1e-4;
/// Shares are pre-rounded, so they only have to add up to 100 within this slack
pub const SHARE_TOLERANCE: f64 = 0.5;

/// Name of the derived table joining regional actuals and forecast
pub const REGIONAL_COMPLETE: &str = "regional_complete";

/// Whether two revenue figures agree within the absolute or relative tolerance
pub fn approx_eq(a: f64, b: f64) -> bool {
    let diff = (a - b).abs();
    diff <= ABSOLUTE_TOLERANCE || diff <= RELATIVE_TOLERANCE * a.abs().max(b.abs())
}

/// The fixed set of forecast tables.
///
/// Constructed once at start-up and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Indexed by `TableName` declaration order
    tables: Vec<Table>,
    regional_complete: Table,
}

impl Dataset {
    /// Builds the dataset from the compiled-in constants.
    #[instrument]
    pub fn builtin() -> Result<Self> {
        debug!("Building dataset from embedded constants");
        Self::from_tables(builtin_tables()?)
    }

    /// Builds the dataset from a static JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let source: DatasetSource = serde_json::from_str(json)?;
        let tables = source
            .tables
            .into_iter()
            .map(|t| t.into_table())
            .collect::<Result<Vec<_>>>()?;
        Self::from_tables(tables)
    }

    /// Builds the dataset from a static JSON file on disk.
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading dataset from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Assembles the six known tables and checks every cross-table invariant.
    /// Fails fast with `DataIntegrity` on the first violation.
    pub fn from_tables(tables: Vec<Table>) -> Result<Self> {
        let mut slots: Vec<Option<Table>> = vec![None; TableName::ALL.len()];

        for table in tables {
            let name: TableName = table.name().parse().map_err(|_| {
                DatasetError::integrity(table.name(), "not one of the known tables")
            })?;
            let slot = &mut slots[name as usize];
            if slot.is_some() {
                return Err(DatasetError::integrity(name.as_str(), "table defined more than once"));
            }
            *slot = Some(table);
        }

        let tables = slots
            .into_iter()
            .zip(TableName::ALL)
            .map(|(slot, name)| {
                slot.ok_or_else(|| DatasetError::integrity(name.as_str(), "table is missing"))
            })
            .collect::<Result<Vec<_>>>()?;

        for (table, name) in tables.iter().zip(TableName::ALL) {
            let expect_snapshot = name == TableName::BusinessStructure2030;
            let is_snapshot = matches!(table.kind(), TableKind::Snapshot { .. });
            if expect_snapshot != is_snapshot {
                return Err(DatasetError::integrity(name.as_str(), "unexpected table kind"));
            }
        }

        let regional_complete = tables[TableName::RegionalData as usize]
            .concat_periods(&tables[TableName::ForecastData as usize], REGIONAL_COMPLETE)?;

        let dataset = Self {
            tables,
            regional_complete,
        };

        dataset.check_total_identity()?;
        dataset.check_rollups()?;
        dataset.check_snapshot()?;

        info!("Dataset ready with {} tables", dataset.tables.len());
        Ok(dataset)
    }

    /// Looks up a table by its string identifier.
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        let name: TableName = name.parse()?;
        Ok(self.table(name))
    }

    /// Infallible lookup; every known table is guaranteed present after construction.
    pub fn table(&self, name: TableName) -> &Table {
        &self.tables[name as usize]
    }

    /// Names of the known tables, in stable order
    pub fn list_tables(&self) -> [&'static str; 6] {
        TableName::ALL.map(|name| name.as_str())
    }

    /// Regional actuals followed by the regional forecast, one column per year
    pub fn regional_complete(&self) -> &Table {
        &self.regional_complete
    }

    fn component<'a>(&self, table: &'a Table, row: &str) -> Result<&'a [f64]> {
        table
            .row_values(row)
            .ok_or_else(|| DatasetError::integrity(table.name(), format!("missing row '{row}'")))
    }

    /// total == traditional + new business, per period
    fn check_total_identity(&self) -> Result<()> {
        let total = self.table(TableName::TotalForecast);
        let traditional = self.component(total, TOTAL_TRADITIONAL)?;
        let new_business = self.component(total, TOTAL_NEW_BUSINESS)?;
        let revenue = self.component(total, TOTAL_REVENUE)?;

        for (i, column) in total.columns().iter().enumerate() {
            let expected = traditional[i] + new_business[i];
            trace!(period = %column, total = revenue[i], expected, "Checking total identity");
            if !approx_eq(revenue[i], expected) {
                return Err(DatasetError::integrity(
                    total.name(),
                    format!(
                        "total {} in '{column}' differs from traditional + new business = {expected}",
                        revenue[i]
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Segment tables roll up into the components of the total forecast
    fn check_rollups(&self) -> Result<()> {
        let total = self.table(TableName::TotalForecast);
        let rollups = [
            (TableName::TraditionalBusiness, TOTAL_TRADITIONAL),
            (TableName::NewBusiness, TOTAL_NEW_BUSINESS),
        ];

        for (segment_name, component) in rollups {
            let segments = self.table(segment_name);
            if segments.columns() != total.columns() {
                return Err(DatasetError::integrity(
                    segments.name(),
                    format!("columns differ from '{}'", total.name()),
                ));
            }
            let expected = self.component(total, component)?;
            for (i, column) in segments.columns().iter().enumerate() {
                let sum: f64 = segments.values().iter().map(|row| row[i]).sum();
                if !approx_eq(sum, expected[i]) {
                    return Err(DatasetError::integrity(
                        segments.name(),
                        format!("segments sum to {sum} in '{column}' but '{component}' is {}", expected[i]),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Shares add up to 100 and revenues match the segment tables
    fn check_snapshot(&self) -> Result<()> {
        let snapshot = self.table(TableName::BusinessStructure2030);
        let TableKind::Snapshot { period } = snapshot.kind() else {
            return Err(DatasetError::integrity(snapshot.name(), "expected a snapshot table"));
        };

        let shares = snapshot.column_values(SNAPSHOT_SHARE).ok_or_else(|| {
            DatasetError::integrity(snapshot.name(), format!("missing column '{SNAPSHOT_SHARE}'"))
        })?;
        let share_sum: f64 = shares.iter().map(|(_, share)| share).sum();
        if (share_sum - 100.0).abs() > SHARE_TOLERANCE {
            return Err(DatasetError::integrity(
                snapshot.name(),
                format!("shares sum to {share_sum}, expected 100"),
            ));
        }

        let revenues = snapshot.column_values(SNAPSHOT_REVENUE).ok_or_else(|| {
            DatasetError::integrity(snapshot.name(), format!("missing column '{SNAPSHOT_REVENUE}'"))
        })?;
        let label = period.label();
        for (business, revenue) in revenues {
            let segment_value = [TableName::TraditionalBusiness, TableName::NewBusiness]
                .into_iter()
                .find_map(|name| self.table(name).value(business, &label));
            match segment_value {
                Some(expected) if approx_eq(revenue, expected) => {}
                Some(expected) => {
                    return Err(DatasetError::integrity(
                        snapshot.name(),
                        format!("revenue of '{business}' is {revenue}, segment tables say {expected}"),
                    ));
                }
                None => {
                    return Err(DatasetError::integrity(
                        snapshot.name(),
                        format!("'{business}' has no segment figures for '{label}'"),
                    ));
                }
            }
        }
        Ok(())
    }
}
