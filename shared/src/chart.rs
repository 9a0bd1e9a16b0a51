//! Chart description for the expenses-by-category widget.
//!
//! [`ChartSpec`] mirrors the option object of a doughnut chart (type, data,
//! datasets, responsive flags, legend and title plugins) and serializes to
//! that shape. [`DoughnutLayout`] turns the dataset into slice arcs for the
//! canvas renderer.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::breakdown::ExpenseBreakdown;

/// Slice colors, reused cyclically
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40",
];

pub const DEFAULT_TITLE: &str = "Expenses by Category";
pub const NO_DATA_MESSAGE: &str = "No expense data available for this period";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Doughnut,
    Pie,
}

impl ChartKind {
    /// Inner radius as a fraction of the outer radius
    pub fn cutout_ratio(self) -> f64 {
        match self {
            ChartKind::Doughnut => 0.5,
            ChartKind::Pie => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    #[default]
    Right,
    Bottom,
    Left,
}

/// What to draw when there is nothing to chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderStyle {
    pub text: String,
    /// CSS height forced on the canvas, in pixels
    pub height_px: u32,
    pub font: String,
    pub color: String,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            text: NO_DATA_MESSAGE.to_string(),
            height_px: 300,
            font: "16px Arial".to_string(),
            color: "#666".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub kind: ChartKind,
    pub title: String,
    pub palette: Vec<String>,
    pub legend_position: LegendPosition,
    pub placeholder: PlaceholderStyle,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            kind: ChartKind::Doughnut,
            title: DEFAULT_TITLE.to_string(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            legend_position: LegendPosition::Right,
            placeholder: PlaceholderStyle::default(),
        }
    }
}

/// Color for the slice at `index`, cycling through the palette
pub fn palette_color(palette: &[String], index: usize) -> &str {
    if palette.is_empty() {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
    } else {
        &palette[index % palette.len()]
    }
}

/// Parse `#RRGGBB` or `#RGB`
pub fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// Legend text for an amount, e.g. `$120.50` or `-$5.00`
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", currency_symbol, amount.abs())
    } else {
        format!("{}{:.2}", currency_symbol, amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub data: Vec<f64>,
    pub background_color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendOptions {
    pub position: LegendPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleOptions {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPlugins {
    pub legend: LegendOptions,
    pub title: TitleOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: ChartPlugins,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartSpec {
    /// Build the proportional chart for a non-empty breakdown
    pub fn doughnut(breakdown: &ExpenseBreakdown, style: &ChartStyle) -> Self {
        let background_color = (0..breakdown.len())
            .map(|i| palette_color(&style.palette, i).to_string())
            .collect();

        Self {
            kind: style.kind,
            data: ChartData {
                labels: breakdown.labels(),
                datasets: vec![Dataset {
                    data: breakdown.amounts(),
                    background_color,
                }],
            },
            options: ChartOptions {
                responsive: true,
                maintain_aspect_ratio: false,
                plugins: ChartPlugins {
                    legend: LegendOptions {
                        position: style.legend_position,
                    },
                    title: TitleOptions {
                        display: true,
                        text: style.title.clone(),
                    },
                },
            },
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.data.labels
    }

    pub fn values(&self) -> &[f64] {
        self.data.datasets.first().map(|d| d.data.as_slice()).unwrap_or(&[])
    }

    pub fn colors(&self) -> &[String] {
        self.data
            .datasets
            .first()
            .map(|d| d.background_color.as_slice())
            .unwrap_or(&[])
    }

    pub fn slice_count(&self) -> usize {
        self.values().len()
    }

    pub fn layout(&self) -> DoughnutLayout {
        DoughnutLayout::compute(self.values(), self.kind.cutout_ratio())
    }
}

/// Either a placeholder message or a chart, never both
#[derive(Debug, Clone, PartialEq)]
pub enum ChartPlan {
    Placeholder(PlaceholderStyle),
    Chart(ChartSpec),
}

impl ChartPlan {
    pub fn for_breakdown(breakdown: &ExpenseBreakdown, style: &ChartStyle) -> Self {
        if breakdown.is_empty() {
            ChartPlan::Placeholder(style.placeholder.clone())
        } else {
            ChartPlan::Chart(ChartSpec::doughnut(breakdown, style))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceArc {
    /// Index into the dataset, and so into the palette
    pub index: usize,
    /// Start angle in radians; 0 points right, angles grow clockwise on screen
    pub start: f64,
    pub sweep: f64,
    pub share: f64,
}

impl SliceArc {
    pub fn end(&self) -> f64 {
        self.start + self.sweep
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoughnutLayout {
    pub slices: Vec<SliceArc>,
    pub cutout_ratio: f64,
}

impl DoughnutLayout {
    /// Drawing starts at 12 o'clock
    pub const START_ANGLE: f64 = -FRAC_PI_2;

    /// Arc resolution when flattening slices into polygons
    const STEP: f64 = PI / 90.0;

    /// Lay out slices proportional to `values`. Non-positive values get a
    /// zero sweep; if nothing is positive every slice is empty.
    pub fn compute(values: &[f64], cutout_ratio: f64) -> Self {
        let positive = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let total: f64 = values.iter().copied().map(positive).sum();

        let mut angle = Self::START_ANGLE;
        let slices = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let share = if total > 0.0 { positive(value) / total } else { 0.0 };
                let slice = SliceArc {
                    index,
                    start: angle,
                    sweep: share * TAU,
                    share,
                };
                angle += slice.sweep;
                slice
            })
            .collect();

        Self {
            slices,
            cutout_ratio: cutout_ratio.clamp(0.0, 0.95),
        }
    }

    /// True when no slice has any area
    pub fn is_empty_ring(&self) -> bool {
        self.slices.iter().all(|s| s.sweep <= 0.0)
    }

    /// Flatten one slice into polygon points around `center`.
    ///
    /// The outer arc runs clockwise and the inner arc back again, so a
    /// full-circle doughnut slice still fills as a ring.
    pub fn slice_polygon(&self, slice: &SliceArc, center: (f64, f64), radius: f64) -> Vec<(i32, i32)> {
        if slice.sweep <= 0.0 || radius <= 0.0 {
            return Vec::new();
        }

        let steps = ((slice.sweep / Self::STEP).ceil() as usize).max(2);
        let point = |r: f64, theta: f64| {
            (
                (center.0 + r * theta.cos()).round() as i32,
                (center.1 + r * theta.sin()).round() as i32,
            )
        };

        let mut points = Vec::with_capacity(2 * steps + 2);
        for step in 0..=steps {
            let theta = slice.start + slice.sweep * step as f64 / steps as f64;
            points.push(point(radius, theta));
        }

        let inner = radius * self.cutout_ratio;
        if inner > 0.0 {
            for step in (0..=steps).rev() {
                let theta = slice.start + slice.sweep * step as f64 / steps as f64;
                points.push(point(inner, theta));
            }
        } else {
            points.push(point(0.0, slice.start));
        }

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::CategoryEntry;

    fn breakdown(n: usize) -> ExpenseBreakdown {
        (0..n)
            .map(|i| CategoryEntry::new(format!("Category {}", i), (i + 1) as f64 * 10.0))
            .collect()
    }

    #[test]
    fn test_empty_breakdown_plans_placeholder() {
        let plan = ChartPlan::for_breakdown(&ExpenseBreakdown::new(), &ChartStyle::default());
        match plan {
            ChartPlan::Placeholder(placeholder) => {
                assert_eq!(placeholder.text, "No expense data available for this period");
                assert_eq!(placeholder.height_px, 300);
            }
            ChartPlan::Chart(_) => panic!("empty breakdown must not build a chart"),
        }
    }

    #[test]
    fn test_chart_has_one_slice_per_entry() {
        let plan = ChartPlan::for_breakdown(&breakdown(3), &ChartStyle::default());
        let ChartPlan::Chart(spec) = plan else {
            panic!("expected a chart");
        };

        assert_eq!(spec.slice_count(), 3);
        assert_eq!(spec.labels().len(), 3);
        assert_eq!(spec.values(), &[10.0, 20.0, 30.0]);
        assert_eq!(spec.kind, ChartKind::Doughnut);
    }

    #[test]
    fn test_palette_cycles_every_six_slices() {
        let spec = ChartSpec::doughnut(&breakdown(8), &ChartStyle::default());
        let colors = spec.colors();

        assert_eq!(colors.len(), 8);
        for (i, color) in colors.iter().enumerate() {
            assert_eq!(color, DEFAULT_PALETTE[i % 6]);
        }
        assert_eq!(colors[6], "#FF6384");
        assert_eq!(colors[7], "#36A2EB");
    }

    #[test]
    fn test_palette_color_falls_back_when_empty() {
        assert_eq!(palette_color(&[], 7), "#36A2EB");
        let custom = vec!["#000000".to_string(), "#ffffff".to_string()];
        assert_eq!(palette_color(&custom, 3), "#ffffff");
    }

    #[test]
    fn test_spec_serializes_to_chart_options_shape() {
        let spec = ChartSpec::doughnut(&breakdown(1), &ChartStyle::default());
        let json = serde_json::to_value(&spec).unwrap();

        assert_eq!(json["type"], "doughnut");
        assert_eq!(json["data"]["labels"][0], "Category 0");
        assert_eq!(json["data"]["datasets"][0]["data"][0], 10.0);
        assert_eq!(json["data"]["datasets"][0]["backgroundColor"][0], "#FF6384");
        assert_eq!(json["options"]["responsive"], true);
        assert_eq!(json["options"]["maintainAspectRatio"], false);
        assert_eq!(json["options"]["plugins"]["legend"]["position"], "right");
        assert_eq!(json["options"]["plugins"]["title"]["display"], true);
        assert_eq!(json["options"]["plugins"]["title"]["text"], "Expenses by Category");
    }

    #[test]
    fn test_layout_sweeps_cover_full_circle() {
        let layout = DoughnutLayout::compute(&[120.5, 45.0, 34.5], 0.5);

        let total_sweep: f64 = layout.slices.iter().map(|s| s.sweep).sum();
        assert!((total_sweep - TAU).abs() < 1e-9);

        let total_share: f64 = layout.slices.iter().map(|s| s.share).sum();
        assert!((total_share - 1.0).abs() < 1e-9);

        assert!((layout.slices[0].start - DoughnutLayout::START_ANGLE).abs() < 1e-12);
        for pair in layout.slices.windows(2) {
            assert!((pair[0].end() - pair[1].start).abs() < 1e-12);
        }
    }

    #[test]
    fn test_layout_share_is_proportional() {
        let layout = DoughnutLayout::compute(&[30.0, 10.0], 0.5);
        assert!((layout.slices[0].share - 0.75).abs() < 1e-12);
        assert!((layout.slices[1].sweep - TAU * 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_layout_non_positive_values_get_no_area() {
        let layout = DoughnutLayout::compute(&[-5.0, 0.0, 20.0], 0.5);
        assert_eq!(layout.slices.len(), 3);
        assert_eq!(layout.slices[0].sweep, 0.0);
        assert_eq!(layout.slices[1].sweep, 0.0);
        assert!((layout.slices[2].sweep - TAU).abs() < 1e-12);
        assert!(!layout.is_empty_ring());

        let zero = DoughnutLayout::compute(&[0.0, 0.0], 0.5);
        assert!(zero.is_empty_ring());
    }

    #[test]
    fn test_slice_polygon_starts_at_twelve_o_clock() {
        let layout = DoughnutLayout::compute(&[1.0, 1.0], 0.5);
        let points = layout.slice_polygon(&layout.slices[0], (100.0, 100.0), 50.0);

        assert_eq!(points[0], (100, 50));
        // Half circle clockwise from the top ends at the bottom
        assert!(points.contains(&(100, 150)));
        // Inner arc closes the ring at half the radius
        assert_eq!(*points.last().unwrap(), (100, 75));
    }

    #[test]
    fn test_pie_slice_closes_at_center() {
        let layout = DoughnutLayout::compute(&[1.0], ChartKind::Pie.cutout_ratio());
        let points = layout.slice_polygon(&layout.slices[0], (10.0, 10.0), 5.0);
        assert_eq!(*points.last().unwrap(), (10, 10));
    }

    #[test]
    fn test_zero_sweep_slice_has_no_polygon() {
        let layout = DoughnutLayout::compute(&[0.0, 3.0], 0.5);
        assert!(layout.slice_polygon(&layout.slices[0], (0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF6384"), Some((255, 99, 132)));
        assert_eq!(parse_hex_color("#666"), Some((102, 102, 102)));
        assert_eq!(parse_hex_color("FF6384"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(120.5, "$"), "$120.50");
        assert_eq!(format_amount(-5.0, "$"), "-$5.00");
        assert_eq!(format_amount(0.0, "€"), "€0.00");
    }
}
