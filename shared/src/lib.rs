//! Target-independent pieces of the expense dashboard: the category
//! breakdown model, line extraction, the chart description and the banner
//! dismissal schedule.

pub mod breakdown;
pub mod chart;
pub mod config;
pub mod dismissal;
pub mod extraction;

pub use breakdown::{CategoryEntry, ExpenseBreakdown};
pub use chart::{
    format_amount, palette_color, parse_hex_color, ChartKind, ChartPlan, ChartSpec, ChartStyle,
    DoughnutLayout, LegendPosition, PlaceholderStyle, SliceArc, DEFAULT_PALETTE,
};
pub use config::{ConfigError, DashboardConfig, ElementIds, LogLevel, CONFIG_ELEMENT_ID};
pub use dismissal::{BannerDismissal, BannerPhase, DismissalTimeline};
pub use extraction::{
    extract_category_amounts, filter_records, parse_amount, parse_category_line, AmountParseError,
    ExtractionReport, ExtractionRules, SkipReason, SkippedLine,
};
