//! Wide-to-long reshaping of tables into chart-ready records.
//!
//! Record order is part of the contract: source row order first, then the
//! caller's column order. Renderers derive legend and stacking order from it.

use common::LongRecord;
use dataset::Table;
use tracing::trace;

use crate::error::{ComputeError, Result};

/// Projects `value_columns` of `table` into `(category, period, value)` records.
///
/// `category_column` must name the table's row dimension. Every value column
/// must exist; the output holds exactly `rows x value_columns` records.
pub fn reshape_to_long(
    table: &Table,
    category_column: &str,
    value_columns: &[&str],
) -> Result<Vec<LongRecord>> {
    if table.category_header() != category_column {
        return Err(ComputeError::UnknownCategoryColumn {
            table: table.name().to_string(),
            column: category_column.to_string(),
        });
    }

    let indices = value_columns
        .iter()
        .map(|column| {
            table
                .column_index(column)
                .ok_or_else(|| ComputeError::column_not_found(table.name(), *column))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut records = Vec::with_capacity(table.row_count() * indices.len());
    for (category, row) in table.rows().iter().zip(table.values()) {
        for (&index, column) in indices.iter().zip(value_columns) {
            records.push(LongRecord::new(category.as_str(), *column, row[index]));
        }
    }

    trace!(table = table.name(), records = records.len(), "Reshaped table to long form");
    Ok(records)
}

/// Long form of every column of `table`.
pub fn reshape_all_columns(table: &Table) -> Vec<LongRecord> {
    table
        .rows()
        .iter()
        .zip(table.values())
        .flat_map(|(category, row)| {
            table
                .columns()
                .iter()
                .zip(row)
                .map(move |(column, value)| LongRecord::new(category.as_str(), column.as_str(), *value))
        })
        .collect()
}
