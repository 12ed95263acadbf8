use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The six chart slots of the dashboard, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    TotalRevenueTrend,
    RegionalDistribution,
    BusinessMixEvolution,
    NewBusinessGrowth,
    BusinessStructure2030,
    RegionalRevenueTrend,
}

impl ChartId {
    pub const ALL: [ChartId; 6] = [
        ChartId::TotalRevenueTrend,
        ChartId::RegionalDistribution,
        ChartId::BusinessMixEvolution,
        ChartId::NewBusinessGrowth,
        ChartId::BusinessStructure2030,
        ChartId::RegionalRevenueTrend,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ChartId::TotalRevenueTrend => "total-revenue-trend",
            ChartId::RegionalDistribution => "regional-distribution",
            ChartId::BusinessMixEvolution => "business-mix-evolution",
            ChartId::NewBusinessGrowth => "new-business-growth",
            ChartId::BusinessStructure2030 => "business-structure-2030",
            ChartId::RegionalRevenueTrend => "regional-revenue-trend",
        }
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Kind of figure the renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Pie,
    Bar,
    StackedArea,
}

/// One data point of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    /// Category or period label on the x axis (or slice name for pies)
    pub label: String,
    pub value: f64,
    /// Optional text annotation drawn next to the point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// A named series; legend order follows the order of series in the spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    pub name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AxisLabels {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Presentation-agnostic description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub id: ChartId,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub category_labels: Vec<String>,
    pub axis_labels: AxisLabels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_id_parses_its_own_labels() {
        for id in ChartId::ALL {
            assert_eq!(id.as_str().parse::<ChartId>().unwrap(), id);
        }
        assert!("revenue-pie".parse::<ChartId>().is_err());
    }

    #[test]
    fn test_chart_spec_wire_format() {
        let spec = ChartSpec {
            id: ChartId::BusinessMixEvolution,
            kind: ChartKind::StackedArea,
            title: "mix".to_string(),
            series: vec![ChartSeries {
                name: "a".to_string(),
                points: vec![ChartPoint::new("2022", 1.5), ChartPoint::new("2023", 2.0).with_text("x")],
            }],
            category_labels: vec!["2022".to_string(), "2023".to_string()],
            axis_labels: AxisLabels {
                x: Some("Year".to_string()),
                y: None,
            },
        };

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["id"], "business-mix-evolution");
        assert_eq!(json["type"], "stackedArea");
        assert_eq!(json["categoryLabels"][1], "2023");
        assert!(json["series"][0]["points"][0].get("text").is_none());
        assert_eq!(json["series"][0]["points"][1]["text"], "x");
    }
}
