//! Builders for the six chart slots.
//!
//! Each builder is a pure function of the dataset and the session's
//! selection; nothing here is cached.

use common::{AxisLabels, ChartId, ChartKind, ChartPoint, ChartSeries, ChartSpec, Fallback, LongRecord};
use dataset::constants::{
    SNAPSHOT_REVENUE, SNAPSHOT_SHARE, TOTAL_NEW_BUSINESS, TOTAL_REVENUE, TOTAL_TRADITIONAL,
};
use dataset::{Dataset, Table, TableName};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};
use crate::lookup::FallbackPolicy;
use crate::reshape::reshape_to_long;
use crate::selection::SelectionState;

const YEAR_AXIS: &str = "Year";
const REVENUE_AXIS: &str = "Revenue (亿美元)";

/// Everything a chart builder reads besides the selection
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub dataset: &'a Dataset,
    pub policy: &'a FallbackPolicy,
}

/// A built chart plus any year substitutions made while building it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub spec: ChartSpec,
    pub fallbacks: Vec<Fallback>,
}

impl RenderedChart {
    fn plain(spec: ChartSpec) -> Self {
        Self {
            spec,
            fallbacks: Vec::new(),
        }
    }
}

/// Builds the chart in slot `id` for `selection`.
#[instrument(skip(ctx))]
pub fn build_chart(ctx: &ChartContext<'_>, id: ChartId, selection: &SelectionState) -> Result<RenderedChart> {
    let dataset = ctx.dataset;
    let rendered = match id {
        ChartId::TotalRevenueTrend => RenderedChart::plain(total_revenue_trend(dataset)?),
        ChartId::RegionalDistribution => regional_distribution(dataset, ctx.policy, selection)?,
        ChartId::BusinessMixEvolution => RenderedChart::plain(business_mix_evolution(dataset)?),
        ChartId::NewBusinessGrowth => RenderedChart::plain(new_business_growth(dataset)?),
        ChartId::BusinessStructure2030 => RenderedChart::plain(business_structure(dataset)?),
        ChartId::RegionalRevenueTrend => RenderedChart::plain(regional_revenue_trend(dataset, selection)?),
    };
    debug!(chart = %id, series = rendered.spec.series.len(), "Chart built");
    Ok(rendered)
}

/// Parses a chart slot identifier such as `regional-distribution`.
pub fn parse_chart_id(raw: &str) -> Result<ChartId> {
    raw.parse().map_err(ComputeError::UnknownChart)
}

/// Groups long records into one series per category, in first-appearance order.
pub fn series_from_long(records: &[LongRecord]) -> Vec<ChartSeries> {
    let mut series: Vec<ChartSeries> = Vec::new();
    for record in records {
        let point = ChartPoint::new(record.period.as_str(), record.value);
        match series.iter_mut().find(|s| s.name == record.category) {
            Some(existing) => existing.points.push(point),
            None => series.push(ChartSeries {
                name: record.category.clone(),
                points: vec![point],
            }),
        }
    }
    series
}

fn all_columns(table: &Table) -> Vec<&str> {
    table.columns().iter().map(String::as_str).collect()
}

fn period_axes() -> AxisLabels {
    AxisLabels {
        x: Some(YEAR_AXIS.to_string()),
        y: Some(REVENUE_AXIS.to_string()),
    }
}

/// Long records of selected rows of a period table, all columns
fn rows_to_long(table: &Table, rows: &[&str]) -> Result<Vec<LongRecord>> {
    let records = reshape_to_long(table, table.category_header(), &all_columns(table))?;
    Ok(records
        .into_iter()
        .filter(|r| rows.contains(&r.category.as_str()))
        .collect())
}

fn total_revenue_trend(dataset: &Dataset) -> Result<ChartSpec> {
    let table = dataset.table(TableName::TotalForecast);
    let records = rows_to_long(table, &[TOTAL_REVENUE])?;

    Ok(ChartSpec {
        id: ChartId::TotalRevenueTrend,
        kind: ChartKind::Line,
        title: "总收入预测趋势 (2022-2030)".to_string(),
        series: series_from_long(&records),
        category_labels: table.columns().to_vec(),
        axis_labels: period_axes(),
    })
}

fn regional_distribution(
    dataset: &Dataset,
    policy: &FallbackPolicy,
    selection: &SelectionState,
) -> Result<RenderedChart> {
    let table = dataset.regional_complete();
    let resolved = policy.resolve(table, selection.end())?;

    let points = resolved
        .values
        .iter()
        .map(|cv| ChartPoint::new(cv.category.as_str(), cv.value))
        .collect();

    let spec = ChartSpec {
        id: ChartId::RegionalDistribution,
        kind: ChartKind::Pie,
        title: format!("各地区收入分布 ({})", resolved.column),
        series: vec![ChartSeries {
            name: resolved.column.clone(),
            points,
        }],
        category_labels: table.rows().to_vec(),
        axis_labels: AxisLabels::default(),
    };

    Ok(RenderedChart {
        spec,
        fallbacks: resolved.fallback.into_iter().collect(),
    })
}

fn business_mix_evolution(dataset: &Dataset) -> Result<ChartSpec> {
    let table = dataset.table(TableName::TotalForecast);
    let records = rows_to_long(table, &[TOTAL_TRADITIONAL, TOTAL_NEW_BUSINESS])?;

    Ok(ChartSpec {
        id: ChartId::BusinessMixEvolution,
        kind: ChartKind::StackedArea,
        title: "业务构成演变 (2022-2030)".to_string(),
        series: series_from_long(&records),
        category_labels: table.columns().to_vec(),
        axis_labels: period_axes(),
    })
}

fn new_business_growth(dataset: &Dataset) -> Result<ChartSpec> {
    let table = dataset.table(TableName::NewBusiness);
    let records = reshape_to_long(table, table.category_header(), &all_columns(table))?;

    Ok(ChartSpec {
        id: ChartId::NewBusinessGrowth,
        kind: ChartKind::Bar,
        title: "Optimus & Robotaxi 业务增长".to_string(),
        series: series_from_long(&records),
        category_labels: table.columns().to_vec(),
        axis_labels: period_axes(),
    })
}

fn business_structure(dataset: &Dataset) -> Result<ChartSpec> {
    let table = dataset.table(TableName::BusinessStructure2030);
    let records = reshape_to_long(table, table.category_header(), &[SNAPSHOT_REVENUE, SNAPSHOT_SHARE])?;

    // records alternate revenue, share per business type
    let points = records
        .chunks(2)
        .map(|pair| {
            ChartPoint::new(pair[0].category.as_str(), pair[0].value)
                .with_text(format!("{:.1}%", pair[1].value))
        })
        .collect();

    Ok(ChartSpec {
        id: ChartId::BusinessStructure2030,
        kind: ChartKind::Bar,
        title: "2030年业务结构分析".to_string(),
        series: vec![ChartSeries {
            name: SNAPSHOT_REVENUE.to_string(),
            points,
        }],
        category_labels: table.rows().to_vec(),
        axis_labels: AxisLabels {
            x: Some("Business Type".to_string()),
            y: Some(REVENUE_AXIS.to_string()),
        },
    })
}

fn regional_revenue_trend(dataset: &Dataset, selection: &SelectionState) -> Result<ChartSpec> {
    let table = dataset.regional_complete();
    let columns: Vec<String> = table
        .periods()
        .into_iter()
        .filter(|period| selection.contains(period.year))
        .map(|period| period.label())
        .collect();
    let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();
    let records = reshape_to_long(table, table.category_header(), &column_refs)?;

    Ok(ChartSpec {
        id: ChartId::RegionalRevenueTrend,
        kind: ChartKind::Line,
        title: format!("各地区收入趋势 ({}-{})", selection.start(), selection.end()),
        series: series_from_long(&records),
        category_labels: columns,
        axis_labels: period_axes(),
    })
}
