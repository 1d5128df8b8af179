use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::AnalyticsParams;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analytics: AnalyticsParams,
    pub dashboard: DashboardSettings,
    pub datasets: DatasetPaths,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Filter options and the selection a dashboard opens with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// The default start of the sales date range (inclusive).
    pub start_date: NaiveDate,
    /// The default end of the sales date range (inclusive).
    pub end_date: NaiveDate,
    pub location_options: Vec<String>,
    pub default_locations: Vec<String>,
    pub category_options: Vec<String>,
    pub default_categories: Vec<String>,
    /// How many products the "top by profit" chart shows.
    pub top_products: usize,
}

/// Where the three source tables are read from when they are not uploaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    pub products: Option<PathBuf>,
    pub sales: Option<PathBuf>,
    pub purchases: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    /// Upper bound on a single dashboard computation.
    pub request_timeout_secs: u64,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            location_options: strings(&["Dhaka", "Chittagong", "Sylhet", "Rajshahi"]),
            default_locations: strings(&["Dhaka"]),
            category_options: strings(&["Groceries", "Electronics", "Clothing", "Perishables"]),
            default_categories: strings(&["Groceries", "Electronics"]),
            top_products: 10,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            request_timeout_secs: 5,
            body_limit_bytes: 1024 * 1024 * 50,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
            file_prefix: "retail-dashboard.log".to_string(),
        }
    }
}

impl Config {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.dashboard;
        if d.start_date > d.end_date {
            return Err(ConfigError::ValidationError(format!(
                "dashboard.start_date ({}) is after dashboard.end_date ({})",
                d.start_date, d.end_date
            )));
        }
        ensure_subset("dashboard.default_locations", &d.default_locations, &d.location_options)?;
        ensure_subset("dashboard.default_categories", &d.default_categories, &d.category_options)?;

        if self.analytics.slow_moving_window_days == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.slow_moving_window_days must be greater than 0".to_string(),
            ));
        }
        if self.analytics.kpi_scale == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.kpi_scale must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "server.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Every selected value must be one of the offered options. An empty option list
/// accepts anything.
fn ensure_subset(field: &str, selected: &[String], options: &[String]) -> Result<(), ConfigError> {
    if options.is_empty() {
        return Ok(());
    }
    match selected.iter().find(|s| !options.contains(s)) {
        Some(unknown) => Err(ConfigError::ValidationError(format!(
            "{field} contains '{unknown}', which is not one of {options:?}"
        ))),
        None => Ok(()),
    }
}
