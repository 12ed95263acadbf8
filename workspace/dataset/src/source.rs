//! Static-file representation of the dataset.
//!
//! The compiled-in constants are the default source; a packaged JSON file of
//! the same shape can replace them at start-up.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::table::{Table, TableKind};

/// One row of a table as stored in the static file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowSource {
    pub category: String,
    pub values: Vec<f64>,
}

/// One table as stored in the static file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSource {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: TableKind,
    pub category_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<RowSource>,
}

fn default_kind() -> TableKind {
    TableKind::PeriodSeries
}

/// Root of the static dataset file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSource {
    pub tables: Vec<TableSource>,
}

impl TableSource {
    pub fn into_table(self) -> Result<Table> {
        let (rows, values) = self
            .rows
            .into_iter()
            .map(|row| (row.category, row.values))
            .unzip();
        Table::new(self.name, self.kind, self.category_header, rows, self.columns, values)
    }
}

impl From<&Table> for TableSource {
    fn from(table: &Table) -> Self {
        Self {
            name: table.name().to_string(),
            kind: table.kind(),
            category_header: table.category_header().to_string(),
            columns: table.columns().to_vec(),
            rows: table
                .rows()
                .iter()
                .zip(table.values())
                .map(|(category, values)| RowSource {
                    category: category.clone(),
                    values: values.clone(),
                })
                .collect(),
        }
    }
}
