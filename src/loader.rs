use crate::error::{DashboardError, Result};
use crate::reshape::reshape;
use crate::schema::ENTITY_COLUMN;
use crate::types::{LoadReport, LongCostRecord, RawCostTable};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Read the wide cost export into memory.
///
/// Fails if the file cannot be read or the entity column is missing. Month
/// and metadata columns are checked later by the reshaper.
pub fn load_raw(path: &Path) -> Result<(RawCostTable, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let name_idx = headers
        .iter()
        .position(|h| h == ENTITY_COLUMN)
        .ok_or_else(|| DashboardError::MissingColumn(ENTITY_COLUMN.to_string()))?;

    let mut rows = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut report = LoadReport::default();

    for result in rdr.records() {
        let record = result?;
        report.total_rows += 1;
        let mut row: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        row.resize(headers.len(), String::new());

        let name = row[name_idx].trim();
        if name.is_empty() {
            report.blank_names += 1;
        } else if !seen.insert(name.to_string()) {
            // Kept as-is; lookups take the first match.
            report.duplicate_names += 1;
        }
        rows.push(row);
    }

    info!(
        path = %path.display(),
        rows = report.total_rows,
        columns = headers.len(),
        "loaded cost export"
    );
    if report.duplicate_names > 0 {
        warn!(duplicates = report.duplicate_names, "duplicate user names in cost export");
    }
    if report.blank_names > 0 {
        debug!(blank = report.blank_names, "rows without a user name");
    }

    Ok((RawCostTable { headers, rows }, report))
}

/// Load the export and turn it into the long-form cost table.
pub fn load_cost_table(path: &Path) -> Result<(Vec<LongCostRecord>, LoadReport)> {
    let (raw, report) = load_raw(path)?;
    let long = reshape(&raw)?;
    Ok((long, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "User,name,email,department,staff,student,2024-01,2024-02,2024-03,2024-04,2024-05,2024-06,2024-07,2024-08,Total";

    fn write_csv(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    fn loads_rows_and_pads_short_ones() {
        let file = write_csv(&format!(
            "{HEADER}\nu1,Ada,a@x,cs,1,0,1,2,3,4,5,6,7,8,36\nu2,Bob,b@x,cs,0,1,1,2\n"
        ));
        let (raw, report) = load_raw(file.path()).unwrap();
        assert_eq!(report.total_rows, 2);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1].len(), raw.headers.len());
        assert_eq!(raw.rows[1][8], "");
    }

    #[test]
    fn counts_duplicate_and_blank_names() {
        let file = write_csv(&format!(
            "{HEADER}\nu1,Ada,,,,,1,1,1,1,1,1,1,1,8\nu2,Ada,,,,,2,2,2,2,2,2,2,2,16\nu3,,,,,,0,0,0,0,0,0,0,0,0\n"
        ));
        let (_, report) = load_raw(file.path()).unwrap();
        assert_eq!(report.duplicate_names, 1);
        assert_eq!(report.blank_names, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_raw(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::Csv(_) | DashboardError::Io(_)));
    }

    #[test]
    fn missing_name_column_is_an_error() {
        let file = write_csv("User,2024-01\nu1,5\n");
        let err = load_raw(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(c) if c == "name"));
    }

    #[test]
    fn export_without_metadata_columns_is_rejected() {
        let file = write_csv(
            "name,2024-01,2024-02,2024-03,2024-04,2024-05,2024-06,2024-07,2024-08\nAda,1,2,3,4,5,6,7,8\n",
        );
        let err = load_cost_table(file.path()).unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn(c) if c == "User"));
    }

    #[test]
    fn load_cost_table_reshapes() {
        let file = write_csv(&format!(
            "{HEADER}\nu1,Ada,,,,,1,2,3,4,5,6,7,8,36\nu2,Bob,,,,,8,7,6,5,4,3,2,1,36\n"
        ));
        let (long, _) = load_cost_table(file.path()).unwrap();
        assert_eq!(long.len(), 16);
    }
}
