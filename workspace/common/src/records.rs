use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tidy-form projection of one table cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LongRecord {
    pub category: String,
    pub period: String,
    pub value: f64,
}

impl LongRecord {
    pub fn new(category: impl Into<String>, period: impl Into<String>, value: f64) -> Self {
        Self {
            category: category.into(),
            period: period.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
}

/// Why a requested year was answered from a different column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum Fallback {
    /// No column for the requested year; the default period was used
    DefaultPeriod { requested: i32 },
    /// Neither the requested year nor the default period exist; the
    /// closest period column was used
    NearestPeriod { requested: i32 },
}

/// Values of one column of a table, keyed by category in row order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct YearSelection {
    pub table: String,
    /// Label of the column the values were read from
    pub column: String,
    pub values: Vec<CategoryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

impl YearSelection {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|cv| cv.category == category)
            .map(|cv| cv.value)
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Active year range of a dashboard session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct YearRange {
    pub start_year: i32,
    pub end_year: i32,
}
