use crate::error::Result;
use crate::types::{DeltaColor, MetricResult};
use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub const CARDS_PER_ROW: usize = 4;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)\n".to_string();
    }
    let mut table = Table::new(slice);
    table.with(Style::markdown());
    format!("{}\n", table)
}

/// Arrow for the direction of change plus a `(!)` flag when the change goes
/// the unwanted way under the metric's emphasis.
fn delta_line(m: &MetricResult) -> String {
    let Some(ratio) = m.growth_ratio else {
        return format!("  {}", m.display_growth);
    };
    let arrow = if ratio >= 1.0 { '▲' } else { '▼' };
    let flagged = match m.delta_color {
        DeltaColor::Normal => ratio < 1.0,
        DeltaColor::Inverse => ratio > 1.0,
        DeltaColor::Off => false,
    };
    if flagged {
        format!("{} {} (!)", arrow, m.display_growth)
    } else {
        format!("{} {}", arrow, m.display_growth)
    }
}

fn card(m: &MetricResult) -> String {
    format!("{}\n{}\n{}", m.label, m.display_value, delta_line(m))
}

/// Lay the metrics out as cards, `per_row` to a row.
pub fn render_metric_cards(metrics: &[MetricResult], per_row: usize) -> String {
    if metrics.is_empty() {
        return "(no users selected)\n".to_string();
    }
    let per_row = per_row.max(1);
    let mut builder = Builder::default();
    for chunk in metrics.chunks(per_row) {
        let mut record: Vec<String> = chunk.iter().map(card).collect();
        record.resize(per_row.min(metrics.len()), String::new());
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LongCostRecord;

    fn metric(entity: &str, ratio: Option<f64>, color: DeltaColor) -> MetricResult {
        MetricResult {
            entity: entity.to_string(),
            label: format!("{} Cost", entity),
            start_value: 1.0,
            end_value: 2.0,
            growth_ratio: ratio,
            display_value: "0.00".to_string(),
            display_growth: ratio.map(|r| format!("{:.2}x", r)).unwrap_or_else(|| "n/a".into()),
            delta_color: color,
        }
    }

    #[test]
    fn delta_lines_follow_emphasis() {
        assert_eq!(delta_line(&metric("A", Some(2.0), DeltaColor::Normal)), "▲ 2.00x");
        assert_eq!(delta_line(&metric("A", Some(2.0), DeltaColor::Inverse)), "▲ 2.00x (!)");
        assert_eq!(delta_line(&metric("A", Some(0.5), DeltaColor::Normal)), "▼ 0.50x (!)");
        assert_eq!(delta_line(&metric("A", None, DeltaColor::Off)), "  n/a");
    }

    #[test]
    fn cards_wrap_rows() {
        let metrics: Vec<_> = ["A", "B", "C", "D", "E"]
            .iter()
            .map(|e| metric(e, Some(1.0), DeltaColor::Normal))
            .collect();
        let out = render_metric_cards(&metrics, CARDS_PER_ROW);
        for e in ["A Cost", "B Cost", "C Cost", "D Cost", "E Cost"] {
            assert!(out.contains(e));
        }
        assert!(render_metric_cards(&[], 4).contains("no users"));
    }

    #[test]
    fn exports_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![LongCostRecord { entity: "Ada".into(), period: 1, value: 5.0 }];
        let csv_path = dir.path().join("view.csv");
        write_csv(&csv_path, &rows).unwrap();
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert!(text.starts_with("Name,YearMonth,Cost"));
        assert!(text.contains("Ada,1,5.0"));

        let json_path = dir.path().join("metrics.json");
        write_json(&json_path, &vec![metric("Ada", None, DeltaColor::Off)]).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json[0]["delta_color"], "off");
        assert!(json[0]["growth_ratio"].is_null());
    }

    #[test]
    fn preview_limits_rows() {
        let rows: Vec<LongCostRecord> = (1..=5)
            .map(|p| LongCostRecord { entity: "Ada".into(), period: p, value: 1.0 })
            .collect();
        let out = preview_table_rows(&rows, 2);
        assert_eq!(out.lines().filter(|l| l.contains("Ada")).count(), 2);
    }
}
