// One full evaluation of the dashboard page: filter, chart, metrics.
//
// Nothing here is kept between evaluations except the cached cost table,
// so every control change simply calls `evaluate` again.
use crate::chart::render_cost_chart;
use crate::error::{DashboardError, Result};
use crate::metrics::compute_metrics;
use crate::output::{render_metric_cards, CARDS_PER_ROW};
use crate::schema::period_label;
use crate::select::{entities, filter, period_bounds};
use crate::types::{DeltaPolicy, FilteredView, LongCostRecord, MetricResult, Selection};

pub const TITLE: &str = "Fabian Cost dashboard";
pub const INTRO: &str = "This is the cost per user of compute. There are additional non compute \
costs and costs for compute that are not attributed to a user.";

#[derive(Debug, Clone)]
pub struct Page {
    pub view: FilteredView,
    pub metrics: Vec<MetricResult>,
    pub text: String,
}

/// The slider range and user list offered to the person at the terminal.
#[derive(Debug, Clone)]
pub struct Controls {
    pub bounds: (u32, u32),
    pub users: Vec<String>,
}

pub fn controls(table: &[LongCostRecord]) -> Result<Controls> {
    let bounds = period_bounds(table)
        .ok_or_else(|| DashboardError::NoData("cost table has no rows".to_string()))?;
    Ok(Controls { bounds, users: entities(table) })
}

/// Controls for a freshly read table, with `selection` carried over: the
/// month range clamped into the new bounds and users that disappeared
/// dropped.
pub fn refresh_controls(
    table: &[LongCostRecord],
    selection: &Selection,
) -> Result<(Controls, Selection)> {
    let controls = controls(table)?;
    let kept: Vec<String> = selection
        .entities
        .iter()
        .filter(|e| controls.users.contains(*e))
        .cloned()
        .collect();
    let selection = Selection::clamped(selection.from, selection.to, controls.bounds, kept)?;
    Ok((controls, selection))
}

pub fn evaluate(
    table: &[LongCostRecord],
    selection: &Selection,
    policy: DeltaPolicy,
    chart_width: usize,
) -> Page {
    let view = filter(table, selection);
    let metrics = compute_metrics(table, selection.from, selection.to, &selection.entities, policy);

    let mut text = String::new();
    text.push_str(&format!("# {}\n\n{}\n\n", TITLE, INTRO));
    if let Some(w) = view.warning {
        text.push_str(&format!("WARNING: {}\n\n", w.message()));
    }
    text.push_str(&format!(
        "## Cost over time ({} to {})\n\n",
        period_label(selection.from),
        period_label(selection.to)
    ));
    text.push_str(&render_cost_chart(&view, chart_width));
    text.push_str(&format!("\n## Cost in {}\n\n", period_label(selection.to)));
    text.push_str(&render_metric_cards(&metrics, CARDS_PER_ROW));

    Page { view, metrics, text }
}
