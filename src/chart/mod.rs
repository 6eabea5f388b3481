//! Chart specification builders.
//!
//! The chart module turns warehouse row sets into Plotly figure JSON
//! for the browser to render.
//!
//! # Mapping Strategy
//!
//! - cross-tab rows -> dense grid -> `heatmap` trace
//! - spatial bins -> `scattermapbox` trace (size + color from count)
//! - shared styling (colorscale, margins) lives here
//!
//! All building is synchronous, pure, in-memory computation over the
//! query result; identical inputs produce identical specs.

use serde_json::{json, Value};

pub mod grid;
pub mod heatmap;
pub mod map;

pub use grid::CrossTabGrid;
pub use heatmap::build_crosstab_chart;
pub use map::build_map_chart;

/// Sunset sequential palette, low to high.
const SUNSET: [&str; 7] = [
    "#f3e79b", "#fac484", "#f8a07e", "#eb7f86", "#ce6693", "#a059a0", "#5c53a5",
];

/// Sunset palette as an explicit Plotly colorscale (evenly spaced stops).
pub(crate) fn sunset_colorscale() -> Value {
    let stops: Vec<Value> = SUNSET
        .iter()
        .enumerate()
        .map(|(i, color)| json!([i as f64 / (SUNSET.len() - 1) as f64, color]))
        .collect();
    Value::Array(stops)
}

/// Tight layout margins shared by both charts.
pub(crate) fn tight_margin() -> Value {
    json!({ "l": 20, "r": 20, "t": 10, "b": 0 })
}
