/// Column names and the fixed reporting calendar of the monthly cost export.
///
/// The export has a header like
/// `User,name,email,department,staff,student,2024-01,...,2024-08,Total`.

/// Column holding the display name of a user.
pub const ENTITY_COLUMN: &str = "name";

/// Identifying metadata that is dropped before reshaping.
pub const DISCARDED_COLUMNS: [&str; 5] = ["User", "email", "department", "staff", "student"];

/// Precomputed row total; tolerated in the input, never used.
pub const TOTAL_COLUMN: &str = "Total";

pub const REPORT_YEAR: i32 = 2024;
pub const MIN_PERIOD: u32 = 1;
pub const MAX_PERIOD: u32 = 8;

/// Costs are stored in raw units and shown in billions.
pub const DISPLAY_DIVISOR: f64 = 1_000_000_000.0;

/// Header label of the column carrying `period`, e.g. `2024-03` for 3.
pub fn period_label(period: u32) -> String {
    format!("{}-{:02}", REPORT_YEAR, period)
}

/// Every period of the reporting year, in order.
pub fn periods() -> impl Iterator<Item = u32> {
    MIN_PERIOD..=MAX_PERIOD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_zero_padded() {
        assert_eq!(period_label(1), "2024-01");
        assert_eq!(period_label(8), "2024-08");
        assert_eq!(periods().count(), 8);
    }
}
