//! Compiled-in forecast figures, in hundred-million currency units.

use crate::error::Result;
use crate::period::Period;
use crate::table::{Table, TableKind, TableName};

pub const REGIONS: [&str; 6] = ["美国", "中国", "欧洲", "亚太", "中东", "其他"];

pub const SEGMENT_PERIODS: [&str; 9] = [
    "2022", "2023", "2024", "2025E", "2026E", "2027E", "2028E", "2029E", "2030E",
];

/// Row keys of the combined total forecast
pub const TOTAL_TRADITIONAL: &str = "传统业务";
pub const TOTAL_NEW_BUSINESS: &str = "新增业务";
pub const TOTAL_REVENUE: &str = "总收入";

/// Measure columns of the business structure snapshot
pub const SNAPSHOT_REVENUE: &str = "收入_亿美元";
pub const SNAPSHOT_SHARE: &str = "占比";

pub const SNAPSHOT_PERIOD: Period = Period::estimate(2030);

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn regional_data() -> Result<Table> {
    Table::new(
        TableName::RegionalData.as_str(),
        TableKind::PeriodSeries,
        "Region",
        labels(&REGIONS),
        labels(&["2022", "2023", "2024"]),
        vec![
            vec![405.53, 452.8, 438.0],
            vec![181.45, 251.01, 250.24],
            vec![80.0, 100.41, 104.26],
            vec![40.0, 55.78, 62.56],
            vec![15.0, 20.08, 20.85],
            vec![92.64, 87.82, 101.15],
        ],
    )
}

fn forecast_data() -> Result<Table> {
    Table::new(
        TableName::ForecastData.as_str(),
        TableKind::PeriodSeries,
        "Region",
        labels(&REGIONS),
        labels(&["2025", "2026", "2027", "2028", "2029", "2030"]),
        vec![
            vec![455.52, 473.74, 492.69, 512.4, 532.9, 554.22],
            vec![267.76, 286.5, 306.56, 328.02, 350.98, 375.55],
            vec![116.77, 130.78, 146.47, 164.05, 183.74, 205.79],
            vec![75.07, 90.08, 108.1, 129.72, 155.66, 186.79],
            vec![23.98, 27.58, 31.72, 36.48, 41.95, 48.24],
            vec![107.62, 114.51, 121.84, 129.64, 137.94, 146.77],
        ],
    )
}

fn traditional_business() -> Result<Table> {
    Table::new(
        TableName::TraditionalBusiness.as_str(),
        TableKind::PeriodSeries,
        "Segment",
        labels(&["汽车业务", "能源业务", "服务业务"]),
        labels(&SEGMENT_PERIODS),
        vec![
            vec![714.62, 824.19, 770.7, 800.02, 861.03, 941.62, 1029.43, 1124.95, 1228.7],
            vec![39.09, 60.35, 100.86, 144.23, 201.92, 282.69, 395.77, 554.08, 775.71],
            vec![60.91, 83.19, 105.34, 133.0, 167.58, 211.15, 266.05, 335.22, 422.38],
        ],
    )
}

fn new_business() -> Result<Table> {
    Table::new(
        TableName::NewBusiness.as_str(),
        TableKind::PeriodSeries,
        "Business",
        labels(&["Optimus", "Robotaxi"]),
        labels(&SEGMENT_PERIODS),
        vec![
            vec![0.0, 0.0, 0.0, 0.0, 3.0, 20.0, 90.0, 200.0, 300.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 5.0, 80.0, 130.0, 200.0],
        ],
    )
}

fn total_forecast() -> Result<Table> {
    Table::new(
        TableName::TotalForecast.as_str(),
        TableKind::PeriodSeries,
        "Component",
        labels(&[TOTAL_TRADITIONAL, TOTAL_NEW_BUSINESS, TOTAL_REVENUE]),
        labels(&SEGMENT_PERIODS),
        vec![
            vec![814.62, 967.73, 976.9, 1077.25, 1230.53, 1435.46, 1691.25, 2014.25, 2426.79],
            vec![0.0, 0.0, 0.0, 0.0, 3.0, 25.0, 170.0, 330.0, 500.0],
            vec![814.62, 967.73, 976.9, 1077.25, 1233.53, 1460.46, 1861.25, 2344.25, 2926.79],
        ],
    )
}

fn business_structure_2030() -> Result<Table> {
    Table::new(
        TableName::BusinessStructure2030.as_str(),
        TableKind::Snapshot { period: SNAPSHOT_PERIOD },
        "业务类型",
        labels(&["汽车业务", "能源业务", "服务业务", "Optimus", "Robotaxi"]),
        labels(&[SNAPSHOT_REVENUE, SNAPSHOT_SHARE]),
        vec![
            vec![1228.7, 42.0],
            vec![775.71, 26.5],
            vec![422.38, 14.4],
            vec![300.0, 10.3],
            vec![200.0, 6.8],
        ],
    )
}

/// All six tables, in listing order.
pub fn builtin_tables() -> Result<Vec<Table>> {
    Ok(vec![
        regional_data()?,
        forecast_data()?,
        traditional_business()?,
        new_business()?,
        total_forecast()?,
        business_structure_2030()?,
    ])
}
