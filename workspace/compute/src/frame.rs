//! Forecast table with year-over-year growth, computed on a polars frame.

use common::ForecastTableRow;
use dataset::constants::{TOTAL_NEW_BUSINESS, TOTAL_REVENUE, TOTAL_TRADITIONAL};
use dataset::{Dataset, Table, TableName};
use polars::prelude::*;
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

fn row(table: &Table, category: &str) -> Result<Vec<f64>> {
    table
        .row_values(category)
        .map(|values| values.to_vec())
        .ok_or_else(|| {
            ComputeError::DataFrame(format!("table '{}' has no row '{category}'", table.name()))
        })
}

/// Builds a frame with one row per period of the total forecast.
///
/// Columns: `period`, `traditional`, `new_business`, `total`.
pub fn total_forecast_frame(dataset: &Dataset) -> Result<DataFrame> {
    let table = dataset.table(TableName::TotalForecast);

    let df = DataFrame::new(vec![
        Series::new("period".into(), table.columns().to_vec()).into(),
        Series::new("traditional".into(), row(table, TOTAL_TRADITIONAL)?).into(),
        Series::new("new_business".into(), row(table, TOTAL_NEW_BUSINESS)?).into(),
        Series::new("total".into(), row(table, TOTAL_REVENUE)?).into(),
    ])?;
    Ok(df)
}

/// The combined forecast table with growth of total revenue over the previous period.
#[instrument(skip(dataset))]
pub fn forecast_table(dataset: &Dataset) -> Result<Vec<ForecastTableRow>> {
    let df = total_forecast_frame(dataset)?
        .lazy()
        .with_column(
            ((col("total") / col("total").shift(lit(1)) - lit(1.0)) * lit(100.0))
                .alias("yoy_growth_percent"),
        )
        .collect()?;

    debug!(rows = df.height(), "Forecast table computed");

    let periods = df.column("period")?.str()?;
    let traditional = df.column("traditional")?.f64()?;
    let new_business = df.column("new_business")?.f64()?;
    let total = df.column("total")?.f64()?;
    let growth = df.column("yoy_growth_percent")?.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let missing = || ComputeError::DataFrame(format!("null value in forecast row {i}"));
        rows.push(ForecastTableRow {
            period: periods.get(i).ok_or_else(missing)?.to_string(),
            traditional: traditional.get(i).ok_or_else(missing)?,
            new_business: new_business.get(i).ok_or_else(missing)?,
            total: total.get(i).ok_or_else(missing)?,
            // a zero previous total has no meaningful growth rate
            yoy_growth_percent: growth.get(i).filter(|g| g.is_finite()),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_has_one_row_per_period() {
        let dataset = Dataset::builtin().unwrap();
        let df = total_forecast_frame(&dataset).unwrap();
        assert_eq!(df.height(), 9);
        assert_eq!(df.width(), 4);
        assert_eq!(
            df.column("total").unwrap().f64().unwrap().get(8).unwrap(),
            2926.79
        );
    }

    #[test]
    fn test_forecast_table_growth() {
        let dataset = Dataset::builtin().unwrap();
        let rows = forecast_table(&dataset).unwrap();
        assert_eq!(rows.len(), 9);

        assert_eq!(rows[0].period, "2022");
        assert_eq!(rows[0].yoy_growth_percent, None);

        let growth_2023 = rows[1].yoy_growth_percent.unwrap();
        assert!((growth_2023 - 18.795).abs() < 0.01, "{growth_2023}");

        let last = rows.last().unwrap();
        assert_eq!(last.period, "2030E");
        assert!((last.traditional + last.new_business - last.total).abs() < 1e-9);
        let growth_2030 = last.yoy_growth_percent.unwrap();
        assert!((growth_2030 - 24.85).abs() < 0.01, "{growth_2030}");
    }
}
