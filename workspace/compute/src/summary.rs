use common::KeyMetrics;
use dataset::constants::{TOTAL_NEW_BUSINESS, TOTAL_REVENUE};
use dataset::{Dataset, Period, TableName};
use tracing::{debug, instrument};

use crate::error::{ComputeError, Result};

/// Period the growth rate is measured from
pub const BASE_PERIOD: Period = Period::actual(2024);

/// Compound annual growth rate in percent over `years`.
pub fn cagr_percent(start: f64, end: f64, years: i32) -> Option<f64> {
    if years <= 0 || start <= 0.0 {
        return None;
    }
    Some(((end / start).powf(1.0 / f64::from(years)) - 1.0) * 100.0)
}

/// Growth of the total from [`BASE_PERIOD`] to `target`. A dataset whose
/// final period is not after the base, or whose base total is not positive,
/// is a data fault rather than a bad request.
fn growth_since_base(target: Period, base_total: f64, total: f64) -> Result<f64> {
    cagr_percent(base_total, total, target.year - BASE_PERIOD.year).ok_or_else(|| {
        ComputeError::Calculation(format!("cannot compute growth from {BASE_PERIOD} to {target}"))
    })
}

/// Headline figures: final-period total, growth since [`BASE_PERIOD`] and
/// the new business share of the final period.
#[instrument(skip(dataset))]
pub fn key_metrics(dataset: &Dataset) -> Result<KeyMetrics> {
    let table = dataset.table(TableName::TotalForecast);
    let periods = table.periods();
    let target = periods
        .last()
        .copied()
        .ok_or_else(|| ComputeError::column_not_found(table.name(), "<last period>"))?;

    let value = |category: &str, period: Period| {
        table
            .value(category, &period.label())
            .ok_or_else(|| ComputeError::column_not_found(table.name(), period.label()))
    };

    let total = value(TOTAL_REVENUE, target)?;
    let base_total = value(TOTAL_REVENUE, BASE_PERIOD)?;
    let new_business = value(TOTAL_NEW_BUSINESS, target)?;

    let cagr = growth_since_base(target, base_total, total)?;
    let share = if total > 0.0 {
        new_business / total * 100.0
    } else {
        0.0
    };

    debug!(%target, total, cagr, share, "Key metrics computed");
    Ok(KeyMetrics {
        target_period: target.label(),
        total_revenue: total,
        base_period: BASE_PERIOD.label(),
        cagr_percent: cagr,
        new_business_revenue: new_business,
        new_business_share_percent: share,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_metrics() {
        let dataset = Dataset::builtin().unwrap();
        let metrics = key_metrics(&dataset).unwrap();

        assert_eq!(metrics.target_period, "2030E");
        assert_eq!(metrics.base_period, "2024");
        assert_eq!(metrics.total_revenue, 2926.79);
        assert_eq!(metrics.new_business_revenue, 500.0);
        assert!((metrics.cagr_percent - 20.07).abs() < 0.01, "{}", metrics.cagr_percent);
        assert!((metrics.new_business_share_percent - 17.08).abs() < 0.01);
    }

    #[test]
    fn test_cagr_edges() {
        assert_eq!(cagr_percent(100.0, 200.0, 0), None);
        assert_eq!(cagr_percent(0.0, 200.0, 3), None);
        let doubled = cagr_percent(100.0, 200.0, 1).unwrap();
        assert!((doubled - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_growth_is_a_calculation_error() {
        let err = growth_since_base(Period::estimate(2030), 0.0, 2926.79).unwrap_err();
        assert!(matches!(err, ComputeError::Calculation(_)), "{err:?}");

        let err = growth_since_base(BASE_PERIOD, 2000.0, 2000.0).unwrap_err();
        assert!(matches!(err, ComputeError::Calculation(_)), "{err:?}");

        let rate = growth_since_base(Period::estimate(2030), 1000.0, 2000.0).unwrap();
        assert!(rate > 0.0);
    }
}
