use crate::error::{DashboardError, Result};
use crate::types::{FilteredView, LongCostRecord, Selection, SelectionWarning};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Users pre-selected when none are given and none of the configured
/// defaults appear in the data.
pub const FALLBACK_DEFAULT_USERS: usize = 3;

/// Smallest and largest month present in the table.
pub fn period_bounds(table: &[LongCostRecord]) -> Option<(u32, u32)> {
    let min = table.iter().map(|r| r.period).min()?;
    let max = table.iter().map(|r| r.period).max()?;
    Some((min, max))
}

/// Distinct user names in order of first appearance.
pub fn entities(table: &[LongCostRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .iter()
        .filter(|r| seen.insert(r.entity.as_str()))
        .map(|r| r.entity.clone())
        .collect()
}

/// The users to show when nothing was picked: the wanted names that exist,
/// or the first few users of the table.
pub fn default_entities(all: &[String], wanted: &[String]) -> Vec<String> {
    let present: Vec<String> = wanted.iter().filter(|w| all.contains(w)).cloned().collect();
    if !present.is_empty() {
        return present;
    }
    all.iter().take(FALLBACK_DEFAULT_USERS).cloned().collect()
}

impl Selection {
    /// Build a selection from a user-entered range, clamped into `bounds`.
    /// A reversed range is swapped rather than rejected.
    pub fn clamped(from: u32, to: u32, bounds: (u32, u32), entities: Vec<String>) -> Result<Self> {
        let (min, max) = bounds;
        if min > max {
            return Err(DashboardError::InvalidSelection(format!(
                "empty month range {}..{}",
                min, max
            )));
        }
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        Ok(Self {
            from: lo.clamp(min, max),
            to: hi.clamp(min, max),
            entities,
        })
    }

    pub fn contains(&self, record: &LongCostRecord) -> bool {
        self.from <= record.period
            && record.period <= self.to
            && self.entities.iter().any(|e| *e == record.entity)
    }
}

/// Rows of `table` inside the selection, in table order.
///
/// An empty user set is not an error: the view is empty and carries a
/// warning for the caller to show.
pub fn filter(table: &[LongCostRecord], selection: &Selection) -> FilteredView {
    if selection.entities.is_empty() {
        warn!("no users selected");
        return FilteredView {
            rows: Vec::new(),
            warning: Some(SelectionWarning::NoEntities),
        };
    }

    let rows: Vec<LongCostRecord> = table
        .iter()
        .filter(|r| selection.contains(r))
        .cloned()
        .collect();
    debug!(
        from = selection.from,
        to = selection.to,
        users = selection.entities.len(),
        rows = rows.len(),
        "filtered cost table"
    );
    FilteredView { rows, warning: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(entity: &str, period: u32, value: f64) -> LongCostRecord {
        LongCostRecord { entity: entity.to_string(), period, value }
    }

    fn sample() -> Vec<LongCostRecord> {
        let mut t = Vec::new();
        for p in 1..=8 {
            for (i, e) in ["Ada", "Bob", "Cy", "Dee"].iter().enumerate() {
                t.push(rec(e, p, (p * 10 + i as u32) as f64));
            }
        }
        t
    }

    #[test]
    fn bounds_and_entities() {
        let t = sample();
        assert_eq!(period_bounds(&t), Some((1, 8)));
        assert_eq!(period_bounds(&[]), None);
        assert_eq!(entities(&t), vec!["Ada", "Bob", "Cy", "Dee"]);
    }

    #[test]
    fn empty_selection_warns() {
        let sel = Selection { from: 1, to: 8, entities: vec![] };
        let view = filter(&sample(), &sel);
        assert!(view.rows.is_empty());
        assert_eq!(view.warning, Some(SelectionWarning::NoEntities));
    }

    #[test]
    fn clamped_swaps_and_clamps() {
        let sel = Selection::clamped(12, 0, (1, 8), vec!["Ada".into()]).unwrap();
        assert_eq!((sel.from, sel.to), (1, 8));
        let sel = Selection::clamped(5, 3, (1, 8), vec![]).unwrap();
        assert_eq!((sel.from, sel.to), (3, 5));
    }

    #[test]
    fn defaults_prefer_wanted_users() {
        let all: Vec<String> = ["Ada", "Bob", "Cy", "Dee"].iter().map(|s| s.to_string()).collect();
        assert_eq!(default_entities(&all, &["Cy".into(), "Zed".into()]), vec!["Cy"]);
        assert_eq!(default_entities(&all, &[]), vec!["Ada", "Bob", "Cy"]);
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_the_selected_rows(
            from in 1u32..=8,
            span in 0u32..8,
            mask in proptest::collection::vec(any::<bool>(), 4),
        ) {
            let table = sample();
            let to = (from + span).min(8);
            let names = ["Ada", "Bob", "Cy", "Dee"];
            let chosen: Vec<String> = names
                .iter()
                .zip(&mask)
                .filter(|(_, keep)| **keep)
                .map(|(n, _)| n.to_string())
                .collect();
            let sel = Selection { from, to, entities: chosen.clone() };
            let view = filter(&table, &sel);

            for r in &table {
                let expected = chosen.contains(&r.entity) && from <= r.period && r.period <= to;
                prop_assert_eq!(view.rows.contains(r), expected);
            }
            prop_assert_eq!(view.warning.is_some(), chosen.is_empty());
            prop_assert_eq!(filter(&table, &sel), view);
        }
    }
}
