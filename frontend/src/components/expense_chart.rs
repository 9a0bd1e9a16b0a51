//! Expenses-by-category doughnut chart drawn on the dashboard canvas.
//!
//! The breakdown comes from the page's JSON data island when one is present,
//! otherwise from the rendered "Category: $Amount" lines. An empty breakdown
//! draws the no-data message instead of a chart.

use std::rc::Rc;

use anyhow::{anyhow, Context};
use gloo::events::EventListener;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_canvas::CanvasBackend;
use shared::{
    extract_category_amounts, filter_records, format_amount, parse_hex_color, ChartPlan, ChartSpec,
    DashboardConfig, ExpenseBreakdown, ExtractionReport, LegendPosition, PlaceholderStyle,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::services::dom::{self, DomError};
use crate::services::Logger;

const COMPONENT: &str = "expense-chart";

const TITLE_COLOR: RGBColor = RGBColor(51, 51, 51);
const LEGEND_TEXT_COLOR: RGBColor = RGBColor(68, 68, 68);
const EMPTY_RING_COLOR: RGBColor = RGBColor(220, 220, 220);
const FALLBACK_SLICE_COLOR: RGBColor = RGBColor(201, 203, 207);

// Layout sizes in CSS pixels, scaled by the device pixel ratio when drawn
const LEGEND_ROW_HEIGHT: u32 = 22;
const LEGEND_PADDING: u32 = 10;
const LEGEND_MAX_WIDTH: u32 = 260;
const LEGEND_SWATCH: u32 = 12;
const LEGEND_GAP: u32 = 8;
const SLICE_MARGIN: u32 = 10;
const TITLE_FONT_PX: f64 = 18.0;
const LEGEND_FONT_PX: f64 = 14.0;
/// Width of an unsized canvas element
const DEFAULT_CANVAS_WIDTH: u32 = 300;

type ChartArea = DrawingArea<CanvasBackend, Shift>;

pub struct ExpenseChart {
    canvas: HtmlCanvasElement,
    plan: ChartPlan,
    currency_symbol: String,
    fallback_height: u32,
}

impl ExpenseChart {
    /// Extract the breakdown, draw it, and keep the chart sized to its
    /// container. Fails when the canvas is missing.
    pub fn mount(config: Rc<DashboardConfig>) -> anyhow::Result<Rc<Self>> {
        let canvas: HtmlCanvasElement = dom::require_element(&config.elements.chart_canvas_id, "canvas")
            .context("expense chart cannot start without its canvas")?;

        let report = load_breakdown(&config).context("reading the expense breakdown")?;
        log_report(&report);

        let chart = Rc::new(Self {
            canvas,
            plan: ChartPlan::for_breakdown(&report.breakdown, &config.chart),
            currency_symbol: config.extraction.currency_symbol.clone(),
            fallback_height: config.chart.placeholder.height_px,
        });

        chart.draw()?;
        if matches!(chart.plan(), ChartPlan::Chart(_)) {
            chart.redraw_on_resize()?;
        }

        Ok(chart)
    }

    pub fn plan(&self) -> &ChartPlan {
        &self.plan
    }

    pub fn draw(&self) -> anyhow::Result<()> {
        match &self.plan {
            ChartPlan::Placeholder(placeholder) => {
                draw_placeholder(&self.canvas, placeholder).context("drawing the no-data message")
            }
            ChartPlan::Chart(spec) => {
                let ratio = fit_to_container(&self.canvas, self.fallback_height)
                    .context("sizing the chart canvas")?;
                draw_chart(&self.canvas, spec, &self.currency_symbol, ratio)
            }
        }
    }

    fn redraw_on_resize(self: &Rc<Self>) -> Result<(), DomError> {
        let window = web_sys::window().ok_or(DomError::NoWindow)?;
        let chart = Rc::clone(self);

        EventListener::new(&window, "resize", move |_| {
            if let Err(err) = chart.draw() {
                Logger::warn_with_component(COMPONENT, &format!("Redraw after resize failed: {:#}", err));
            }
        })
        .forget();

        Ok(())
    }
}

/// Prefer the structured data island; fall back to the rendered lines
pub fn load_breakdown(config: &DashboardConfig) -> Result<ExtractionReport, DomError> {
    if let Some(json) = dom::read_json_island(&config.elements.breakdown_data_id)? {
        match serde_json::from_str::<ExpenseBreakdown>(&json) {
            Ok(records) => {
                Logger::debug_with_component(
                    COMPONENT,
                    &format!("Using structured breakdown with {} records", records.len()),
                );
                return Ok(filter_records(records, &config.extraction));
            }
            Err(err) => Logger::warn_with_component(
                COMPONENT,
                &format!("Ignoring breakdown data island, reading page text instead: {}", err),
            ),
        }
    }

    let lines = dom::collect_texts(
        &config.elements.category_container_id,
        &config.elements.category_line_selector,
    )?;
    Ok(extract_category_amounts(lines, &config.extraction))
}

fn log_report(report: &ExtractionReport) {
    for line in &report.skipped {
        let message = format!(
            "Skipped line {} '{}': {}",
            line.position,
            line.text.trim(),
            line.reason
        );
        if line.is_malformed() {
            Logger::warn_with_component(COMPONENT, &message);
        } else {
            Logger::debug_with_component(COMPONENT, &message);
        }
    }

    Logger::info_with_component(
        COMPONENT,
        &format!("Charting {} categories", report.breakdown.len()),
    );
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, DomError> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| DomError::Js("canvas has no 2d context".to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| DomError::Js("2d context has an unexpected type".to_string()))
}

/// Fix the canvas height and write the centered no-data message
pub fn draw_placeholder(canvas: &HtmlCanvasElement, placeholder: &PlaceholderStyle) -> Result<(), DomError> {
    canvas
        .style()
        .set_property("height", &format!("{}px", placeholder.height_px))?;

    let ctx = context_2d(canvas)?;
    ctx.set_font(&placeholder.font);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    #[allow(deprecated)]
    ctx.set_fill_style(&JsValue::from_str(&placeholder.color));
    ctx.fill_text(
        &placeholder.text,
        f64::from(canvas.width()) / 2.0,
        f64::from(canvas.height()) / 2.0,
    )?;

    Ok(())
}

fn scaled(css_px: u32, ratio: f64) -> u32 {
    (f64::from(css_px) * ratio).round() as u32
}

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|window| window.device_pixel_ratio())
        .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
        .unwrap_or(1.0)
}

/// Backing-store size for a canvas laid out at `css` pixels. A zero
/// dimension (canvas not laid out yet) takes the fallback.
fn backing_size(css: (i32, i32), fallback: (u32, u32), ratio: f64) -> (u32, u32) {
    let width = if css.0 > 0 { css.0 as u32 } else { fallback.0 };
    let height = if css.1 > 0 { css.1 as u32 } else { fallback.1 };
    (scaled(width, ratio), scaled(height, ratio))
}

/// Let CSS size the canvas to its container, then match the backing store
/// to the laid-out size. The canvas is sized from its own box, never from
/// the parent's, so an auto-height container cannot feed back into it.
/// Returns the device pixel ratio used.
fn fit_to_container(canvas: &HtmlCanvasElement, fallback_height: u32) -> Result<f64, DomError> {
    let style = canvas.style();
    style.set_property("display", "block")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;

    let ratio = device_pixel_ratio();
    let (width, height) = backing_size(
        (canvas.client_width(), canvas.client_height()),
        (DEFAULT_CANVAS_WIDTH, fallback_height),
        ratio,
    );
    if canvas.width() != width {
        canvas.set_width(width);
    }
    if canvas.height() != height {
        canvas.set_height(height);
    }

    Ok(ratio)
}

fn draw_error<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow!("chart drawing failed: {:?}", err)
}

fn draw_chart(
    canvas: &HtmlCanvasElement,
    spec: &ChartSpec,
    currency_symbol: &str,
    ratio: f64,
) -> anyhow::Result<()> {
    let backend = CanvasBackend::with_canvas_object(canvas.clone())
        .ok_or_else(|| anyhow!("canvas has no 2d drawing context"))?;
    let root = backend.into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    let title = &spec.options.plugins.title;
    let body = if title.display {
        root.titled(
            &title.text,
            ("sans-serif", TITLE_FONT_PX * ratio).into_font().color(&TITLE_COLOR),
        )
            .map_err(draw_error)?
    } else {
        root.clone()
    };

    let (pie_area, legend_area) = split_for_legend(
        &body,
        spec.options.plugins.legend.position,
        spec.slice_count(),
        ratio,
    );
    draw_slices(&pie_area, spec, ratio)?;
    draw_legend(&legend_area, spec, currency_symbol, ratio)?;

    root.present().map_err(draw_error)?;
    Ok(())
}

/// Width (side legends) or height (top/bottom legends) given to the legend
fn legend_extent(position: LegendPosition, (width, height): (u32, u32), entries: usize, ratio: f64) -> u32 {
    match position {
        LegendPosition::Left | LegendPosition::Right => {
            (width * 35 / 100).min(scaled(LEGEND_MAX_WIDTH, ratio))
        }
        LegendPosition::Top | LegendPosition::Bottom => {
            let rows = entries as u32 * scaled(LEGEND_ROW_HEIGHT, ratio);
            (rows + 2 * scaled(LEGEND_PADDING, ratio)).min(height / 2)
        }
    }
}

/// Returns (chart area, legend area)
fn split_for_legend(
    area: &ChartArea,
    position: LegendPosition,
    entries: usize,
    ratio: f64,
) -> (ChartArea, ChartArea) {
    let (width, height) = area.dim_in_pixel();
    let extent = legend_extent(position, (width, height), entries, ratio) as i32;

    match position {
        LegendPosition::Right => area.split_horizontally(width as i32 - extent),
        LegendPosition::Left => {
            let (legend, chart) = area.split_horizontally(extent);
            (chart, legend)
        }
        LegendPosition::Bottom => area.split_vertically(height as i32 - extent),
        LegendPosition::Top => {
            let (legend, chart) = area.split_vertically(extent);
            (chart, legend)
        }
    }
}

fn slice_color(spec: &ChartSpec, index: usize) -> RGBColor {
    spec.colors()
        .get(index)
        .and_then(|color| parse_hex_color(color))
        .map(|(r, g, b)| RGBColor(r, g, b))
        .unwrap_or(FALLBACK_SLICE_COLOR)
}

fn draw_slices(area: &ChartArea, spec: &ChartSpec, ratio: f64) -> anyhow::Result<()> {
    let (width, height) = area.dim_in_pixel();
    let center = (f64::from(width) / 2.0, f64::from(height) / 2.0);
    let margin = f64::from(scaled(SLICE_MARGIN, ratio));
    let radius = (f64::from(width.min(height)) / 2.0 - margin).max(0.0);
    let stroke = scaled(2, ratio);
    let layout = spec.layout();

    if layout.is_empty_ring() {
        area.draw(&Circle::new(
            (center.0 as i32, center.1 as i32),
            radius as i32,
            EMPTY_RING_COLOR.stroke_width(stroke),
        ))
        .map_err(draw_error)?;
        return Ok(());
    }

    for slice in &layout.slices {
        let points = layout.slice_polygon(slice, center, radius);
        let Some(&first) = points.first() else {
            continue;
        };

        let color = slice_color(spec, slice.index);
        area.draw(&Polygon::new(points.clone(), color.filled()))
            .map_err(draw_error)?;

        // White separators between slices
        let mut outline = points;
        outline.push(first);
        area.draw(&PathElement::new(outline, WHITE.stroke_width(stroke)))
            .map_err(draw_error)?;
    }

    Ok(())
}

fn legend_label(label: &str, amount: f64, currency_symbol: &str) -> String {
    format!("{} ({})", label, format_amount(amount, currency_symbol))
}

fn draw_legend(area: &ChartArea, spec: &ChartSpec, currency_symbol: &str, ratio: f64) -> anyhow::Result<()> {
    let (_, height) = area.dim_in_pixel();
    let row_height = scaled(LEGEND_ROW_HEIGHT, ratio) as i32;
    let padding = scaled(LEGEND_PADDING, ratio) as i32;
    let swatch = scaled(LEGEND_SWATCH, ratio) as i32;
    let gap = scaled(LEGEND_GAP, ratio) as i32;
    let rows = spec.slice_count() as i32;
    let top = ((height as i32 - rows * row_height) / 2).max(padding);
    let left = padding;
    let text_style = ("sans-serif", LEGEND_FONT_PX * ratio)
        .into_font()
        .color(&LEGEND_TEXT_COLOR);

    for (i, (label, amount)) in spec.labels().iter().zip(spec.values()).enumerate() {
        let y = top + i as i32 * row_height;

        area.draw(&Rectangle::new(
            [(left, y), (left + swatch, y + swatch)],
            slice_color(spec, i).filled(),
        ))
        .map_err(draw_error)?;

        area.draw(&Text::new(
            legend_label(label, *amount, currency_symbol),
            (left + swatch + gap, y),
            text_style.clone(),
        ))
        .map_err(draw_error)?;
    }

    Ok(())
}
