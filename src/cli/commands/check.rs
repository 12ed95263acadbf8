use anyhow::{Result, bail};
use common::ChartId;
use compute::{SelectionState, default_view_controller, forecast_table, key_metrics};
use dataset::Dataset;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::load_dataset;

/// Outcome of one self-check step
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub name: String,
    pub error: Option<String>,
}

impl CheckOutcome {
    fn from_result<T, E: std::fmt::Display>(
        name: impl Into<String>,
        result: std::result::Result<T, E>,
    ) -> Self {
        Self {
            name: name.into(),
            error: result.err().map(|e| e.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Run every check against the compiled-in dataset, and against the static
/// file at `dataset_path` when given.
pub fn run_checks(dataset_path: Option<&Path>) -> Vec<CheckOutcome> {
    let mut outcomes = Vec::new();

    let dataset = Dataset::builtin();
    outcomes.push(CheckOutcome::from_result("dataset integrity", dataset.as_ref().map(|_| ())));
    let Ok(dataset) = dataset else {
        return outcomes;
    };
    let dataset = Arc::new(dataset);

    let controller = default_view_controller(dataset.clone());
    let selection = SelectionState::default();
    for id in ChartId::ALL {
        let result = controller
            .render(id, &selection)
            .map_err(|e| e.to_string())
            .and_then(|spec| {
                if spec.series.iter().all(|s| s.points.is_empty()) {
                    Err("no data points".to_string())
                } else {
                    Ok(())
                }
            });
        outcomes.push(CheckOutcome::from_result(format!("chart {id}"), result));
    }

    outcomes.push(CheckOutcome::from_result("key metrics", key_metrics(&dataset)));
    outcomes.push(CheckOutcome::from_result("forecast table", forecast_table(&dataset)));

    if let Some(path) = dataset_path {
        outcomes.push(CheckOutcome::from_result(
            format!("dataset file {}", path.display()),
            load_dataset(Some(path)),
        ));
    }

    outcomes
}

pub fn check(dataset_path: Option<&Path>) -> Result<()> {
    info!("Running deployment self-check");
    let outcomes = run_checks(dataset_path);

    for outcome in &outcomes {
        match &outcome.error {
            None => println!("[PASS] {}", outcome.name),
            Some(e) => {
                error!("Check '{}' failed: {}", outcome.name, e);
                println!("[FAIL] {}: {}", outcome.name, e);
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    debug!("{} checks run, {} failed", outcomes.len(), failed);
    if failed > 0 {
        bail!("{failed} of {} checks failed", outcomes.len());
    }

    info!("All {} checks passed", outcomes.len());
    Ok(())
}
