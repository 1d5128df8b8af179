use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Tunable constants of the inventory analytics.
///
/// The reference date anchors the slow-moving window. It is a parameter rather
/// than "today" so that reports over a historical dataset are reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsParams {
    pub reference_date: NaiveDate,
    pub slow_moving_window_days: u32,
    /// A product selling fewer units than this within the window is slow-moving.
    pub slow_moving_threshold: u32,
    /// Stock above `reorder_level * overstock_multiplier` is overstocked.
    pub overstock_multiplier: u32,
    /// KPI totals are reported in units of this size (thousands by default).
    pub kpi_scale: u32,
}

impl AnalyticsParams {
    /// The trailing window used for slow-moving detection, ending at the reference date.
    ///
    /// A window reaching past the earliest representable date starts there instead.
    pub fn slow_moving_window(&self) -> DateWindow {
        let start = self
            .reference_date
            .checked_sub_days(Days::new(u64::from(self.slow_moving_window_days)))
            .unwrap_or(NaiveDate::MIN);
        DateWindow::new(start, self.reference_date)
    }
}

impl Default for AnalyticsParams {
    fn default() -> Self {
        Self {
            reference_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            slow_moving_window_days: 90,
            slow_moving_threshold: 40,
            overstock_multiplier: 15,
            kpi_scale: 1000,
        }
    }
}
