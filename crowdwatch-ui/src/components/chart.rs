//! Chart Components
//!
//! Occupancy line, demographics area chart and demographics pie, drawn on
//! HTML5 Canvas.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crowdwatch::panels::{self, DemographicsPoint, DemographicsSplit, OccupancyPoint};
use crowdwatch::PanelState;

use super::loading::ChartSkeleton;
use crate::state::dashboard::use_dashboard;
use crate::state::session::use_auth;

const OCCUPANCY_COLOR: &str = "#FF9800";
const MALE_COLOR: &str = "#2196F3";
const FEMALE_COLOR: &str = "#E91E63";

const MARGIN_LEFT: f64 = 50.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Average occupancy over the last ten hours
#[component]
pub fn OccupancyChart() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let api = auth.api.clone();
    let series = create_local_resource(
        move || dashboard.selection.get(),
        move |selection| {
            let api = api.clone();
            async move { panels::load_occupancy(&api, selection.as_ref()).await }
        },
    );

    create_effect(move |_| {
        let points = series.get().unwrap_or_default();
        if let (Some(canvas), Some(points)) = (canvas_ref.get(), settled(points)) {
            draw_occupancy(&canvas, &points);
        }
    });

    view! {
        <ChartFrame title="Occupancy" loading=Signal::derive(move || series.get().map_or(true, |s| s.is_loading()))>
            <canvas node_ref=canvas_ref width="800" height="300" class="w-full h-64 rounded-lg" />
        </ChartFrame>
    }
}

/// Male and female visitors per bucket over the last eight hours
#[component]
pub fn DemographicsChart() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let api = auth.api.clone();
    let series = create_local_resource(
        move || dashboard.selection.get(),
        move |selection| {
            let api = api.clone();
            async move { panels::load_demographics(&api, selection.as_ref()).await }
        },
    );

    create_effect(move |_| {
        let points = series.get().unwrap_or_default();
        if let (Some(canvas), Some(points)) = (canvas_ref.get(), settled(points)) {
            draw_demographics(&canvas, &points);
        }
    });

    view! {
        <ChartFrame title="Demographics" loading=Signal::derive(move || series.get().map_or(true, |s| s.is_loading()))>
            <canvas node_ref=canvas_ref width="800" height="300" class="w-full h-64 rounded-lg" />
            <Legend />
        </ChartFrame>
    }
}

/// Male/female share of the last 24 hours
#[component]
pub fn DemographicsPie() -> impl IntoView {
    let auth = use_auth();
    let dashboard = use_dashboard();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let api = auth.api.clone();
    let split = create_local_resource(
        move || dashboard.selection.get(),
        move |selection| {
            let api = api.clone();
            async move { panels::load_demographics_split(&api, selection.as_ref()).await }
        },
    );
    let totals = move || split.get().and_then(settled).unwrap_or_default();

    create_effect(move |_| {
        let value = totals();
        if let Some(canvas) = canvas_ref.get() {
            draw_pie(&canvas, &value);
        }
    });

    view! {
        <ChartFrame title="Visitors (24h)" loading=Signal::derive(move || split.get().map_or(true, |s| s.is_loading()))>
            <canvas node_ref=canvas_ref width="300" height="300" class="w-48 h-48 mx-auto" />
            <div class="flex justify-center gap-6 mt-4 text-sm">
                <span style=format!("color: {}", MALE_COLOR)>
                    {move || format!("Male {}%", totals().male_percent())}
                </span>
                <span style=format!("color: {}", FEMALE_COLOR)>
                    {move || format!("Female {}%", totals().female_percent())}
                </span>
            </div>
        </ChartFrame>
    }
}

/// Card with a title; shows a skeleton over the children while loading
#[component]
fn ChartFrame(
    title: &'static str,
    #[prop(into)]
    loading: Signal<bool>,
    children: Children,
) -> impl IntoView {
    view! {
        <section class="bg-gray-800 rounded-xl p-6 relative">
            <h2 class="text-xl font-semibold mb-4">{title}</h2>
            <div class=move || if loading.get() { "hidden" } else { "" }>
                {children()}
            </div>
            {move || loading.get().then(|| view! { <ChartSkeleton /> })}
        </section>
    }
}

#[component]
fn Legend() -> impl IntoView {
    view! {
        <div class="flex justify-center gap-4 mt-4">
            {[("Male", MALE_COLOR), ("Female", FEMALE_COLOR)].into_iter().map(|(label, color)| view! {
                <div class="flex items-center space-x-2">
                    <div class="w-3 h-3 rounded-full" style=format!("background-color: {}", color) />
                    <span class="text-sm text-gray-300">{label}</span>
                </div>
            }).collect_view()}
        </div>
    }
}

/// Settled value to draw; fallback draws the empty series
fn settled<T: Default>(state: PanelState<T>) -> Option<T> {
    if state.is_loading() {
        None
    } else {
        Some(state.settled_or_default())
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Chart-area geometry shared by the line and area charts
#[derive(Debug, Clone, Copy, PartialEq)]
struct Plot {
    width: f64,
    height: f64,
    max: f64,
    count: usize,
}

impl Plot {
    fn new(width: f64, height: f64, max: f64, count: usize) -> Self {
        Self {
            width,
            height,
            max: if max > 0.0 { max * 1.1 } else { 1.0 },
            count,
        }
    }

    fn chart_width(&self) -> f64 {
        self.width - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn chart_height(&self) -> f64 {
        self.height - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            MARGIN_LEFT + self.chart_width() / 2.0
        } else {
            MARGIN_LEFT + index as f64 / (self.count - 1) as f64 * self.chart_width()
        }
    }

    /// Canvas y grows downward
    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (1.0 - value / self.max) * self.chart_height()
    }

    fn baseline(&self) -> f64 {
        MARGIN_TOP + self.chart_height()
    }
}

fn draw_axes(ctx: &CanvasRenderingContext2d, plot: &Plot, labels: &[&str]) {
    ctx.set_fill_style(&"#1f2937".into()); // gray-800
    ctx.fill_rect(0.0, 0.0, plot.width, plot.height);

    ctx.set_stroke_style(&"#374151".into()); // gray-700
    ctx.set_line_width(1.0);
    ctx.set_font("12px sans-serif");

    for i in 0..=4 {
        let value = plot.max * (4 - i) as f64 / 4.0;
        let y = plot.y(value);
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(plot.width - MARGIN_RIGHT, y);
        ctx.stroke();

        ctx.set_fill_style(&"#9ca3af".into()); // gray-400
        let _ = ctx.fill_text(&format!("{:.0}", value), 5.0, y + 4.0);
    }

    // Thin out labels so they don't overlap
    let step = (labels.len() / 6).max(1);
    for (i, label) in labels.iter().enumerate().step_by(step) {
        let _ = ctx.fill_text(label, plot.x(i) - 25.0, plot.height - 10.0);
    }

    if labels.is_empty() {
        ctx.set_fill_style(&"#6b7280".into());
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("No data", plot.width / 2.0 - 30.0, plot.height / 2.0);
    }
}

fn draw_occupancy(canvas: &HtmlCanvasElement, points: &[OccupancyPoint]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let max = points.iter().map(|p| p.occupancy).fold(0.0, f64::max);
    let plot = Plot::new(canvas.width() as f64, canvas.height() as f64, max, points.len());
    let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    draw_axes(&ctx, &plot, &labels);

    if points.is_empty() {
        return;
    }

    ctx.set_stroke_style(&OCCUPANCY_COLOR.into());
    ctx.set_line_width(2.0);
    ctx.begin_path();
    for (i, point) in points.iter().enumerate() {
        let (x, y) = (plot.x(i), plot.y(point.occupancy));
        if i == 0 {
            ctx.move_to(x, y);
        } else {
            ctx.line_to(x, y);
        }
    }
    ctx.stroke();

    ctx.set_fill_style(&OCCUPANCY_COLOR.into());
    for (i, point) in points.iter().enumerate() {
        ctx.begin_path();
        let _ = ctx.arc(plot.x(i), plot.y(point.occupancy), 3.0, 0.0, std::f64::consts::PI * 2.0);
        ctx.fill();
    }
}

fn draw_demographics(canvas: &HtmlCanvasElement, points: &[DemographicsPoint]) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let max = points
        .iter()
        .map(|p| p.male.max(p.female) as f64)
        .fold(0.0, f64::max);
    let plot = Plot::new(canvas.width() as f64, canvas.height() as f64, max, points.len());
    let labels: Vec<&str> = points.iter().map(|p| p.label.as_str()).collect();
    draw_axes(&ctx, &plot, &labels);

    if points.is_empty() {
        return;
    }

    let series: [(fn(&DemographicsPoint) -> u64, &str); 2] =
        [(|p| p.male, MALE_COLOR), (|p| p.female, FEMALE_COLOR)];

    for (value, color) in series {
        ctx.begin_path();
        ctx.move_to(plot.x(0), plot.baseline());
        for (i, point) in points.iter().enumerate() {
            ctx.line_to(plot.x(i), plot.y(value(point) as f64));
        }
        ctx.line_to(plot.x(points.len() - 1), plot.baseline());
        ctx.close_path();

        ctx.set_global_alpha(0.3);
        ctx.set_fill_style(&color.into());
        ctx.fill();
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style(&color.into());
        ctx.set_line_width(2.0);
        ctx.stroke();
    }
}

/// Start and end angles of the male and female slices, clockwise from 12 o'clock
fn pie_slices(split: &DemographicsSplit) -> Option<[(f64, f64); 2]> {
    let total = split.total();
    if total == 0 {
        return None;
    }
    let start = -std::f64::consts::FRAC_PI_2;
    let male_end = start + split.male as f64 / total as f64 * std::f64::consts::TAU;
    Some([(start, male_end), (male_end, start + std::f64::consts::TAU)])
}

fn draw_pie(canvas: &HtmlCanvasElement, split: &DemographicsSplit) {
    let Some(ctx) = context_2d(canvas) else {
        return;
    };
    let (width, height) = (canvas.width() as f64, canvas.height() as f64);
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = cx.min(cy) - 10.0;

    ctx.clear_rect(0.0, 0.0, width, height);

    let Some(slices) = pie_slices(split) else {
        ctx.set_fill_style(&"#374151".into());
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, radius, 0.0, std::f64::consts::TAU);
        ctx.fill();
        return;
    };

    for ((start, end), color) in slices.into_iter().zip([MALE_COLOR, FEMALE_COLOR]) {
        if end <= start {
            continue;
        }
        ctx.set_fill_style(&color.into());
        ctx.begin_path();
        ctx.move_to(cx, cy);
        let _ = ctx.arc(cx, cy, radius, start, end);
        ctx.close_path();
        ctx.fill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_plot_scales_to_chart_area() {
        let plot = Plot::new(800.0, 300.0, 100.0, 5);
        assert_eq!(plot.x(0), MARGIN_LEFT);
        assert_eq!(plot.x(4), 800.0 - MARGIN_RIGHT);
        assert_eq!(plot.y(0.0), plot.baseline());
        assert!(plot.y(100.0) > MARGIN_TOP);
    }

    #[wasm_bindgen_test]
    fn test_plot_single_point_centered() {
        let plot = Plot::new(800.0, 300.0, 0.0, 1);
        assert_eq!(plot.x(0), MARGIN_LEFT + plot.chart_width() / 2.0);
        assert_eq!(plot.max, 1.0);
    }

    #[wasm_bindgen_test]
    fn test_pie_slices() {
        assert_eq!(pie_slices(&DemographicsSplit::default()), None);

        let split = DemographicsSplit { male: 1, female: 3 };
        let [(m0, m1), (f0, f1)] = pie_slices(&split).unwrap();
        assert!((m1 - m0 - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(m1, f0);
        assert!((f1 - m0 - std::f64::consts::TAU).abs() < 1e-9);
    }
}
