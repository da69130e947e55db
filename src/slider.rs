// Standalone date slider demo: pick a start date between two bounds on a
// fixed day grid and echo it back.
use crate::error::{DashboardError, Result};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone)]
pub struct DateSlider {
    pub label: String,
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub value: NaiveDate,
    pub step_days: i64,
    /// Display pattern in `YYYY-MM-DD` notation.
    pub format: String,
}

impl DateSlider {
    pub fn new(label: &str, min: NaiveDate, max: NaiveDate, value: NaiveDate) -> Result<Self> {
        if min > max {
            return Err(DashboardError::InvalidDate(format!(
                "slider minimum {} is after maximum {}",
                min, max
            )));
        }
        let mut slider = Self {
            label: label.to_string(),
            min,
            max,
            value: min,
            step_days: 1,
            format: "YYYY-MM".to_string(),
        };
        slider.value = slider.snap(value);
        Ok(slider)
    }

    /// The "When do you start?" slider over January to August 2024.
    pub fn start_time() -> Result<Self> {
        let min = ymd(2024, 1, 1)?;
        let max = ymd(2024, 8, 1)?;
        Self::new("When do you start?", min, max, min)
    }

    pub fn with_step(mut self, days: i64) -> Self {
        self.step_days = days.max(1);
        self.value = self.snap(self.value);
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    /// Clamp into `[min, max]` and round down onto the step grid from `min`.
    fn snap(&self, candidate: NaiveDate) -> NaiveDate {
        let clamped = candidate.clamp(self.min, self.max);
        let offset = (clamped - self.min).num_days();
        self.min + Duration::days(offset - offset % self.step_days)
    }

    /// Move the slider to `candidate` and return where it landed.
    pub fn select(&mut self, candidate: NaiveDate) -> NaiveDate {
        self.value = self.snap(candidate);
        self.value
    }

    /// The current value rendered with the slider's display format.
    pub fn display(&self) -> String {
        self.value.format(&to_strftime(&self.format)).to_string()
    }
}

fn ymd(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| DashboardError::InvalidDate(format!("{}-{}-{}", y, m, d)))
}

/// `YYYY-MM-DD` style tokens to chrono's strftime syntax.
fn to_strftime(pattern: &str) -> String {
    pattern
        .replace("YYYY", "%Y")
        .replace("MM", "%m")
        .replace("DD", "%d")
}
