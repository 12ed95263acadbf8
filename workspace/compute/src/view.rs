use common::{ChartId, ChartSpec, YearSelection};
use dataset::{Dataset, Table};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

use crate::charts::{ChartContext, build_chart};
use crate::dependency::dependents;
use crate::error::Result;
use crate::lookup::FallbackPolicy;
use crate::selection::{InputId, SelectionState, YearRangeChanged};

/// Rendered chart specs of one session, keyed by slot.
///
/// Specs are shared behind `Arc`; a chart that is not recomputed keeps the
/// very same allocation across events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    charts: BTreeMap<ChartId, Arc<ChartSpec>>,
}

impl Dashboard {
    pub fn get(&self, id: ChartId) -> Option<&Arc<ChartSpec>> {
        self.charts.get(&id)
    }

    /// Charts in slot order
    pub fn charts(&self) -> impl Iterator<Item = &Arc<ChartSpec>> {
        self.charts.values()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

/// Result of handling one interaction event
#[derive(Debug, Clone, PartialEq)]
pub struct RecomputeOutcome {
    pub selection: SelectionState,
    /// Inputs considered fired by the event
    pub fired: Vec<InputId>,
    /// Charts rebuilt for this event, in slot order
    pub recomputed: Vec<ChartId>,
}

/// Maps selections to chart specs.
///
/// Holds the shared, read-only dataset. Per-session state lives in
/// [`Session`], never here.
#[derive(Debug)]
pub struct ViewController {
    dataset: Arc<Dataset>,
    policy: FallbackPolicy,
    fallback_events: AtomicU64,
}

impl ViewController {
    pub fn new(dataset: Arc<Dataset>, policy: FallbackPolicy) -> Self {
        Self {
            dataset,
            policy,
            fallback_events: AtomicU64::new(0),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn policy(&self) -> &FallbackPolicy {
        &self.policy
    }

    /// Number of year substitutions made while rendering charts
    pub fn fallback_events(&self) -> u64 {
        self.fallback_events.load(Ordering::Relaxed)
    }

    /// Renders one chart slot for `selection`.
    pub fn render(&self, id: ChartId, selection: &SelectionState) -> Result<ChartSpec> {
        let ctx = ChartContext {
            dataset: &self.dataset,
            policy: &self.policy,
        };
        let rendered = build_chart(&ctx, id, selection)?;
        if !rendered.fallbacks.is_empty() {
            let total = self.count_fallbacks(rendered.fallbacks.len());
            warn!(
                chart = %id,
                fallbacks = ?rendered.fallbacks,
                total,
                "Chart rendered with substituted period"
            );
        }
        Ok(rendered.spec)
    }

    /// Reads the column for `year` from `table` under the controller's
    /// fallback policy, counting any substitution.
    pub fn select_year(&self, table: &Table, year: i32) -> Result<YearSelection> {
        let selection = self.policy.resolve(table, year)?;
        if let Some(fallback) = &selection.fallback {
            let total = self.count_fallbacks(1);
            debug!(table = table.name(), ?fallback, total, "Year lookup substituted");
        }
        Ok(selection)
    }

    fn count_fallbacks(&self, n: usize) -> u64 {
        let n = n as u64;
        self.fallback_events.fetch_add(n, Ordering::Relaxed) + n
    }

    /// Renders every slot for `selection`.
    #[instrument(skip(self))]
    pub fn render_all(&self, selection: &SelectionState) -> Result<Dashboard> {
        let mut charts = BTreeMap::new();
        for id in ChartId::ALL {
            charts.insert(id, Arc::new(self.render(id, selection)?));
        }
        Ok(Dashboard { charts })
    }

    /// Starts a session at the default selection with every chart rendered.
    pub fn new_session(&self) -> Result<Session> {
        let selection = SelectionState::default();
        let dashboard = self.render_all(&selection)?;
        Ok(Session { selection, dashboard })
    }

    /// Applies a range event to `session`.
    ///
    /// The charts depending on the inputs that fired are rebuilt from the
    /// full new selection; every other chart is left untouched. Invalid
    /// events leave the session unchanged.
    #[instrument(skip(self, session))]
    pub fn on_selection_changed(
        &self,
        session: &mut Session,
        event: YearRangeChanged,
    ) -> Result<RecomputeOutcome> {
        let next = event.to_selection()?;

        let mut fired = session.selection.changed_inputs(&next);
        if fired.is_empty() {
            // re-sent value: every input of the control fires again
            fired = InputId::ALL.to_vec();
        }
        let recomputed = dependents(&fired);
        debug!(?fired, ?recomputed, "Dispatching selection change");

        let mut rebuilt = Vec::with_capacity(recomputed.len());
        for id in &recomputed {
            rebuilt.push((*id, Arc::new(self.render(*id, &next)?)));
        }

        // commit only once every dependent chart rendered
        session.selection = next;
        for (id, spec) in rebuilt {
            session.dashboard.charts.insert(id, spec);
        }

        info!(
            start = next.start(),
            end = next.end(),
            recomputed = recomputed.len(),
            "Selection changed"
        );
        Ok(RecomputeOutcome {
            selection: next,
            fired,
            recomputed,
        })
    }
}

/// Per-session view state: the active selection and its rendered charts
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    selection: SelectionState,
    dashboard: Dashboard,
}

impl Session {
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use dataset::{Period, TableName};

    fn controller() -> ViewController {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        ViewController::new(Arc::new(Dataset::builtin().unwrap()), FallbackPolicy::default())
    }

    #[test]
    fn test_new_session_renders_every_slot() {
        let controller = controller();
        let session = controller.new_session().unwrap();
        assert_eq!(session.selection(), SelectionState::default());
        assert_eq!(session.dashboard().len(), ChartId::ALL.len());
        let ids: Vec<ChartId> = session.dashboard().charts().map(|c| c.id).collect();
        assert_eq!(ids, ChartId::ALL.to_vec());
    }

    #[test]
    fn test_end_change_recomputes_only_end_dependents() {
        let controller = controller();
        let mut session = controller.new_session().unwrap();
        let before = session.dashboard().clone();

        let outcome = controller
            .on_selection_changed(&mut session, YearRangeChanged::new(2022, 2027))
            .unwrap();

        assert_eq!(outcome.fired, vec![InputId::YearRangeEnd]);
        assert_eq!(
            outcome.recomputed,
            vec![ChartId::RegionalDistribution, ChartId::RegionalRevenueTrend]
        );

        for id in ChartId::ALL {
            let old = before.get(id).unwrap();
            let new = session.dashboard().get(id).unwrap();
            if outcome.recomputed.contains(&id) {
                assert!(!Arc::ptr_eq(old, new), "{id} should be a fresh spec");
            } else {
                assert!(Arc::ptr_eq(old, new), "{id} should be untouched");
                assert_eq!(old, new);
            }
        }

        let pie = session.dashboard().get(ChartId::RegionalDistribution).unwrap();
        assert_eq!(pie.title, "各地区收入分布 (2027)");
    }

    #[test]
    fn test_start_change_recomputes_trend_only() {
        let controller = controller();
        let mut session = controller.new_session().unwrap();
        let before = session.dashboard().clone();

        let outcome = controller
            .on_selection_changed(&mut session, YearRangeChanged::new(2025, 2030))
            .unwrap();
        assert_eq!(outcome.recomputed, vec![ChartId::RegionalRevenueTrend]);
        assert!(Arc::ptr_eq(
            before.get(ChartId::RegionalDistribution).unwrap(),
            session.dashboard().get(ChartId::RegionalDistribution).unwrap()
        ));
        let trend = session.dashboard().get(ChartId::RegionalRevenueTrend).unwrap();
        assert_eq!(trend.category_labels.first().map(String::as_str), Some("2025"));
    }

    #[test]
    fn test_resent_range_recomputes_all_dependents() {
        let controller = controller();
        let mut session = controller.new_session().unwrap();
        let outcome = controller
            .on_selection_changed(&mut session, YearRangeChanged::new(2022, 2030))
            .unwrap();
        assert_eq!(outcome.fired, InputId::ALL.to_vec());
        assert_eq!(
            outcome.recomputed,
            vec![ChartId::RegionalDistribution, ChartId::RegionalRevenueTrend]
        );
    }

    #[test]
    fn test_reversed_range_leaves_session_unchanged() {
        let controller = controller();
        let mut session = controller.new_session().unwrap();
        let before = session.clone();

        let err = controller
            .on_selection_changed(&mut session, YearRangeChanged::new(2030, 2022))
            .unwrap_err();
        assert!(matches!(err, ComputeError::InvalidSelection(_)));
        assert_eq!(session, before);
    }

    #[test]
    fn test_sessions_are_independent() {
        let controller = controller();
        let mut first = controller.new_session().unwrap();
        let second = controller.new_session().unwrap();

        controller
            .on_selection_changed(&mut first, YearRangeChanged::new(2023, 2025))
            .unwrap();
        assert_eq!(first.selection(), SelectionState::new(2023, 2025).unwrap());
        assert_eq!(second.selection(), SelectionState::default());
    }

    #[test]
    fn test_year_substitutions_are_counted() {
        let controller = controller();
        let table = controller.dataset().table(TableName::RegionalData);

        let exact = controller.select_year(table, 2024).unwrap();
        assert!(!exact.is_fallback());
        assert_eq!(controller.fallback_events(), 0);

        let substituted = controller.select_year(table, 2027).unwrap();
        assert_eq!(substituted.column, "2024");
        assert_eq!(controller.fallback_events(), 1);

        controller.select_year(table, 2029).unwrap();
        assert_eq!(controller.fallback_events(), 2);
    }

    #[test]
    fn test_domain_years_render_without_fallback() {
        let dataset = Arc::new(Dataset::builtin().unwrap());
        let controller = ViewController::new(dataset, FallbackPolicy::new(Period::actual(2024)));
        let mut session = controller.new_session().unwrap();
        for end in 2022..=2030 {
            controller
                .on_selection_changed(&mut session, YearRangeChanged::new(2022, end))
                .unwrap();
        }
        assert_eq!(controller.fallback_events(), 0);
    }
}
