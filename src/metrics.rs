use crate::schema::DISPLAY_DIVISOR;
use crate::types::{DeltaColor, DeltaPolicy, LongCostRecord, MetricResult};
use crate::util::format_number;
use tracing::debug;

/// Cost of `entity` in `period`, NaN when the table has no such row.
/// Duplicate user names resolve to the first row in table order.
pub fn value_at(table: &[LongCostRecord], entity: &str, period: u32) -> f64 {
    table
        .iter()
        .find(|r| r.entity == entity && r.period == period)
        .map(|r| r.value)
        .unwrap_or(f64::NAN)
}

/// `end / start`, or `None` when either side is missing or the start is zero.
pub fn growth_ratio(start: f64, end: f64) -> Option<f64> {
    if !start.is_finite() || !end.is_finite() || start == 0.0 {
        return None;
    }
    Some(end / start)
}

pub fn format_growth(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{}x", format_number(r, 2)),
        None => "n/a".to_string(),
    }
}

fn delta_color(ratio: Option<f64>, policy: DeltaPolicy) -> DeltaColor {
    match (ratio, policy) {
        (None, _) => DeltaColor::Off,
        (Some(_), DeltaPolicy::IncreaseIsGood) => DeltaColor::Normal,
        (Some(_), DeltaPolicy::IncreaseIsBad) => DeltaColor::Inverse,
    }
}

/// One metric per user comparing the cost at `start` with the cost at `end`.
///
/// Values are scaled to billions before display; the ratio is unaffected by
/// the scaling.
pub fn compute_metrics(
    table: &[LongCostRecord],
    start: u32,
    end: u32,
    entities: &[String],
    policy: DeltaPolicy,
) -> Vec<MetricResult> {
    entities
        .iter()
        .map(|entity| {
            let start_value = value_at(table, entity, start);
            let end_value = value_at(table, entity, end);
            let ratio = growth_ratio(start_value, end_value);
            debug!(%entity, start_value, end_value, ?ratio, "computed metric");
            MetricResult {
                entity: entity.clone(),
                label: format!("{} Cost", entity),
                start_value,
                end_value,
                growth_ratio: ratio,
                display_value: format_number(end_value / DISPLAY_DIVISOR, 2),
                display_growth: format_growth(ratio),
                delta_color: delta_color(ratio, policy),
            }
        })
        .collect()
}
