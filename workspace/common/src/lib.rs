//! Common transport-layer types shared across the rendering boundary.
//! The compute crate produces these structs and the HTTP layer serializes
//! them, so a renderer can deserialize responses without duplicating shapes.

mod chart;
mod records;
mod summary;

pub use chart::{AxisLabels, ChartId, ChartKind, ChartPoint, ChartSeries, ChartSpec};
pub use records::{CategoryValue, Fallback, LongRecord, YearRange, YearSelection};
pub use summary::{ForecastTableRow, KeyMetrics};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_selection_lookup() {
        let selection = YearSelection {
            table: "regional_data".to_string(),
            column: "2024".to_string(),
            values: vec![
                CategoryValue { category: "美国".to_string(), value: 438.0 },
                CategoryValue { category: "中国".to_string(), value: 250.24 },
            ],
            fallback: Some(Fallback::DefaultPeriod { requested: 2027 }),
        };
        assert_eq!(selection.get("中国"), Some(250.24));
        assert_eq!(selection.get("火星"), None);
        assert!(selection.is_fallback());

        let json = serde_json::to_value(&selection).unwrap();
        assert_eq!(json["fallback"]["reason"], "default_period");
        assert_eq!(json["fallback"]["requested"], 2027);
    }

    #[test]
    fn test_api_response_ok() {
        let response = ApiResponse::ok(vec![1, 2], "done");
        assert!(response.success);
        assert_eq!(response.message, "done");
        assert_eq!(response.data, vec![1, 2]);
    }
}
