use serde::Serialize;
use tabled::Tabled;

/// The cost export as read from disk: the header row plus every data row,
/// cells still as text. Rows are padded to the header width.
#[derive(Debug, Clone, Default)]
pub struct RawCostTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawCostTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// One `(entity, period, value)` triple of the long-form table.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct LongCostRecord {
    #[serde(rename = "Name")]
    #[tabled(rename = "Name")]
    pub entity: String,
    #[serde(rename = "YearMonth")]
    #[tabled(rename = "YearMonth")]
    pub period: u32,
    #[serde(rename = "Cost")]
    #[tabled(rename = "Cost")]
    pub value: f64,
}

/// Inclusive month range plus the users to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub from: u32,
    pub to: u32,
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionWarning {
    NoEntities,
}

impl SelectionWarning {
    pub fn message(&self) -> &'static str {
        match self {
            SelectionWarning::NoEntities => "Select at least one user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView {
    pub rows: Vec<LongCostRecord>,
    pub warning: Option<SelectionWarning>,
}

/// Emphasis applied to a metric's delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaColor {
    Normal,
    Inverse,
    Off,
}

/// How computed growth figures are emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaPolicy {
    #[default]
    IncreaseIsGood,
    IncreaseIsBad,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricResult {
    pub entity: String,
    pub label: String,
    pub start_value: f64,
    pub end_value: f64,
    pub growth_ratio: Option<f64>,
    pub display_value: String,
    pub display_growth: String,
    pub delta_color: DeltaColor,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub blank_names: usize,
    pub duplicate_names: usize,
}
