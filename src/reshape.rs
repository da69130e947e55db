// Wide-to-long transformation of the cost export.
//
// The export has one column per month; charts and metrics want one row per
// (user, month). Only the name column and the month columns survive.
use crate::error::{DashboardError, Result};
use crate::schema::{periods, period_label, DISCARDED_COLUMNS, ENTITY_COLUMN, TOTAL_COLUMN};
use crate::types::{LongCostRecord, RawCostTable};
use crate::util::parse_cost;
use tracing::{debug, info};

/// A month column after normalization: the bare period number it carries
/// and where it sits in the raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PeriodColumn {
    period: u32,
    index: usize,
}

/// Locate every month column of the reporting year, keyed by its bare
/// period number instead of the `YYYY-MM` label.
fn period_columns(raw: &RawCostTable) -> Result<Vec<PeriodColumn>> {
    periods()
        .map(|p| {
            let label = period_label(p);
            let index = raw
                .column_index(&label)
                .ok_or(DashboardError::MissingColumn(label))?;
            Ok(PeriodColumn { period: p, index })
        })
        .collect()
}

/// Check that the identifying metadata to drop is all there and count the
/// columns that will not survive, `Total` included when present.
fn discarded_columns(raw: &RawCostTable) -> Result<usize> {
    for name in DISCARDED_COLUMNS {
        if raw.column_index(name).is_none() {
            return Err(DashboardError::MissingColumn(name.to_string()));
        }
    }
    let total = usize::from(raw.column_index(TOTAL_COLUMN).is_some());
    Ok(DISCARDED_COLUMNS.len() + total)
}

/// Unpivot the wide table into `(Name, YearMonth, Cost)` rows.
///
/// Output is ordered month-major, user-minor, with exactly one row per
/// (raw row, month). Blank or unparsable cells become NaN.
pub fn reshape(raw: &RawCostTable) -> Result<Vec<LongCostRecord>> {
    let name_idx = raw
        .column_index(ENTITY_COLUMN)
        .ok_or_else(|| DashboardError::MissingColumn(ENTITY_COLUMN.to_string()))?;
    let dropped = discarded_columns(raw)?;
    let columns = period_columns(raw)?;
    debug!(dropped, kept = columns.len() + 1, "normalized cost columns");

    let mut long = Vec::with_capacity(raw.rows.len() * columns.len());
    for col in &columns {
        for row in &raw.rows {
            let entity = row.get(name_idx).map(|s| s.trim()).unwrap_or_default();
            let cell = row.get(col.index).map(String::as_str).unwrap_or_default();
            long.push(LongCostRecord {
                entity: entity.to_string(),
                period: col.period,
                value: parse_cost(cell),
            });
        }
    }

    info!(rows = long.len(), users = raw.rows.len(), months = columns.len(), "reshaped cost table");
    Ok(long)
}
