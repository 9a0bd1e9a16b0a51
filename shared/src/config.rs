//! Page-level configuration for the dashboard scripts.
//!
//! Every field has a default matching the markup the server renders. A page
//! can override any subset with a JSON object in a
//! `<script type="application/json" id="dashboardConfig">` element.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chart::{parse_hex_color, ChartStyle};
use crate::dismissal::DismissalTimeline;
use crate::extraction::ExtractionRules;

/// Id of the element carrying configuration overrides
pub const CONFIG_ELEMENT_ID: &str = "dashboardConfig";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Where the dashboard behaviors find their elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub category_container_id: String,
    /// Selector for category lines, relative to the container
    pub category_line_selector: String,
    /// JSON island with `[{label, amount}]` records
    pub breakdown_data_id: String,
    pub chart_canvas_id: String,
    pub date_input_id: String,
    pub banner_selector: String,
    /// Manual close control, relative to a banner
    pub banner_close_selector: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            category_container_id: "expensesByCategory".to_string(),
            category_line_selector: "p".to_string(),
            breakdown_data_id: "expensesByCategoryData".to_string(),
            chart_canvas_id: "expenseChart".to_string(),
            date_input_id: "date".to_string(),
            banner_selector: ".alert".to_string(),
            banner_close_selector: ".btn-close".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub elements: ElementIds,
    pub extraction: ExtractionRules,
    pub chart: ChartStyle,
    pub dismissal: DismissalTimeline,
    pub log_level: LogLevel,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("chart palette must contain at least one color")]
    EmptyPalette,
    #[error("invalid palette color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("total row marker must not be empty")]
    EmptyTotalMarker,
    #[error("element setting '{0}' must not be empty")]
    EmptyElement(&'static str),
}

impl DashboardConfig {
    /// Parse overrides on top of the defaults and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chart.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(bad) = self
            .chart
            .palette
            .iter()
            .find(|color| parse_hex_color(color).is_none())
        {
            return Err(ConfigError::InvalidColor(bad.clone()));
        }
        if self.extraction.total_marker.is_empty() {
            return Err(ConfigError::EmptyTotalMarker);
        }

        let elements = &self.elements;
        let required = [
            ("category_container_id", &elements.category_container_id),
            ("category_line_selector", &elements.category_line_selector),
            ("chart_canvas_id", &elements.chart_canvas_id),
            ("banner_selector", &elements.banner_selector),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyElement(name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, LegendPosition, DEFAULT_PALETTE};

    #[test]
    fn test_defaults_match_page_markup() {
        let config = DashboardConfig::default();

        assert_eq!(config.elements.category_container_id, "expensesByCategory");
        assert_eq!(config.elements.chart_canvas_id, "expenseChart");
        assert_eq!(config.elements.date_input_id, "date");
        assert_eq!(config.elements.banner_selector, ".alert");
        assert_eq!(config.extraction.total_marker, "Total");
        assert_eq!(config.extraction.currency_symbol, "$");
        assert_eq!(config.chart.kind, ChartKind::Doughnut);
        assert_eq!(config.chart.legend_position, LegendPosition::Right);
        assert_eq!(config.chart.palette, DEFAULT_PALETTE.to_vec());
        assert_eq!(config.dismissal.delay_ms, 3000);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let json = r#"{
            "dismissal": { "delay_ms": 5000 },
            "chart": { "title": "Spending", "legend_position": "bottom" },
            "log_level": "debug"
        }"#;
        let config = DashboardConfig::from_json(json).unwrap();

        assert_eq!(config.dismissal.delay_ms, 5000);
        assert_eq!(config.dismissal.fade_ms, 500);
        assert_eq!(config.chart.title, "Spending");
        assert_eq!(config.chart.legend_position, LegendPosition::Bottom);
        assert_eq!(config.chart.palette.len(), 6);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.elements.chart_canvas_id, "expenseChart");
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = DashboardConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_rejects_empty_palette() {
        let err = DashboardConfig::from_json(r#"{ "chart": { "palette": [] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette));
    }

    #[test]
    fn test_rejects_invalid_color() {
        let err = DashboardConfig::from_json(r#"{ "chart": { "palette": ["red"] } }"#).unwrap_err();
        assert_eq!(err.to_string(), "invalid palette color 'red', expected #RRGGBB");
    }

    #[test]
    fn test_rejects_empty_total_marker() {
        let err = DashboardConfig::from_json(r#"{ "extraction": { "total_marker": "" } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTotalMarker));
    }

    #[test]
    fn test_rejects_blank_canvas_id() {
        let err = DashboardConfig::from_json(r#"{ "elements": { "chart_canvas_id": " " } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyElement("chart_canvas_id")));
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }
}
