pub mod charts;
pub mod dependency;
pub mod error;
pub mod frame;
pub mod lookup;
pub mod reshape;
pub mod selection;
pub mod summary;
pub mod view;

use dataset::Dataset;
use std::sync::Arc;

pub use charts::{ChartContext, RenderedChart, build_chart, parse_chart_id};
pub use dependency::{DEPENDENCY_TABLE, dependents, inputs_of};
pub use error::{ComputeError, Result};
pub use frame::forecast_table;
pub use lookup::{FallbackPolicy, select_by_year};
pub use reshape::{reshape_all_columns, reshape_to_long};
pub use selection::{InputId, SelectionState, YEAR_DOMAIN, YearRangeChanged};
pub use summary::key_metrics;
pub use view::{Dashboard, RecomputeOutcome, Session, ViewController};

/// Returns a default pre-configured view controller that will be used most of the time.
///
/// Missing years fall back to the last actual period, `2024`.
pub fn default_view_controller(dataset: Arc<Dataset>) -> ViewController {
    ViewController::new(dataset, FallbackPolicy::default())
}
