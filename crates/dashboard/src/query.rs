use crate::error::DashboardError;
use chrono::NaiveDate;
use configuration::DashboardSettings;
use serde::{Deserialize, Serialize};

/// The filter selections of one dashboard request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardQuery {
    /// First sale date included.
    pub start: NaiveDate,
    /// Last sale date included.
    pub end: NaiveDate,
    pub locations: Vec<String>,
    pub categories: Vec<String>,
}

impl DashboardQuery {
    /// The selection a dashboard opens with.
    pub fn from_settings(settings: &DashboardSettings) -> Self {
        Self {
            start: settings.start_date,
            end: settings.end_date,
            locations: settings.default_locations.clone(),
            categories: settings.default_categories.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.start > self.end {
            return Err(DashboardError::InvalidQuery(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Caller-supplied selections. Anything left as `None` falls back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryOverrides {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub locations: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

impl QueryOverrides {
    pub fn resolve(self, settings: &DashboardSettings) -> Result<DashboardQuery, DashboardError> {
        let defaults = DashboardQuery::from_settings(settings);
        let query = DashboardQuery {
            start: self.start.unwrap_or(defaults.start),
            end: self.end.unwrap_or(defaults.end),
            locations: self.locations.unwrap_or(defaults.locations),
            categories: self.categories.unwrap_or(defaults.categories),
        };
        query.validate()?;
        Ok(query)
    }
}

/// Splits a comma-separated list, dropping empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
