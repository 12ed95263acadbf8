use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Headline figures shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeyMetrics {
    /// Period the "final" figures refer to, e.g. `2030E`
    pub target_period: String,
    pub total_revenue: f64,
    /// Period the growth rate is measured from, e.g. `2024`
    pub base_period: String,
    /// Compound annual growth rate between base and target, in percent
    pub cagr_percent: f64,
    pub new_business_revenue: f64,
    /// New business revenue as a percentage of total revenue
    pub new_business_share_percent: f64,
}

/// One period of the combined forecast table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastTableRow {
    pub period: String,
    pub traditional: f64,
    pub new_business: f64,
    pub total: f64,
    /// Growth of total revenue over the previous period in percent; absent for the first period
    pub yoy_growth_percent: Option<f64>,
}
