//! Accident-location map figure builder.

use serde_json::{json, Value};

use crate::chart::{sunset_colorscale, tight_margin};
use crate::warehouse::SpatialBin;

/// Fixed map center: downtown Grand Rapids.
pub const MAP_CENTER: (f64, f64) = (42.96, -85.67);

/// Fixed zoom level for the city view.
const MAP_ZOOM: u32 = 10;

/// Light neutral street basemap.
const MAP_STYLE: &str = "carto-positron";

/// Marker size cap in pixels for the binned view.
const MAX_MARKER_PX: f64 = 15.0;

/// Build the map figure for a set of spatial bins.
///
/// One marker per bin; marker size and color are both driven by the bin
/// count, with the continuous color domain spanning [min, max] of the
/// counts. Empty input (no click yet, or a click matching zero rows)
/// renders a single minimal placeholder marker at the city center so
/// the map is never undefined.
///
/// `uirevision` is pinned in both branches: pan/zoom state belongs to
/// the client and must survive server-driven re-renders.
pub fn build_map_chart(bins: &[SpatialBin]) -> Value {
    if bins.is_empty() {
        return placeholder_map();
    }

    let lats: Vec<f64> = bins.iter().map(|b| b.lat).collect();
    let lons: Vec<f64> = bins.iter().map(|b| b.lon).collect();
    let counts: Vec<i64> = bins.iter().map(|b| b.count).collect();

    let cmin = counts.iter().copied().min().unwrap_or(0);
    let cmax = counts.iter().copied().max().unwrap_or(0);

    json!({
        "data": [{
            "type": "scattermapbox",
            "mode": "markers",
            "lat": lats,
            "lon": lons,
            "marker": {
                "size": counts,
                "sizemode": "area",
                "sizeref": area_sizeref(cmax, MAX_MARKER_PX),
                "color": counts,
                "colorscale": sunset_colorscale(),
                "cmin": cmin,
                "cmax": cmax,
            },
            "hovertemplate": "Accident Count: %{marker.color}<extra></extra>",
        }],
        "layout": map_layout(),
    })
}

/// Single-marker placeholder at the fixed center.
fn placeholder_map() -> Value {
    json!({
        "data": [{
            "type": "scattermapbox",
            "mode": "markers",
            "lat": [MAP_CENTER.0],
            "lon": [MAP_CENTER.1],
            "marker": {
                "size": [5],
                "sizemode": "area",
                "sizeref": area_sizeref(5, 1.0),
                "color": [5],
                "colorscale": sunset_colorscale(),
            },
            "hoverinfo": "skip",
        }],
        "layout": map_layout(),
    })
}

fn map_layout() -> Value {
    json!({
        "mapbox": {
            "style": MAP_STYLE,
            "zoom": MAP_ZOOM,
            "center": { "lat": MAP_CENTER.0, "lon": MAP_CENTER.1 },
        },
        "uirevision": true,
        "margin": tight_margin(),
    })
}

/// Plotly area-mode size reference capping the largest marker at
/// `max_px` pixels.
fn area_sizeref(max_count: i64, max_px: f64) -> f64 {
    2.0 * max_count as f64 / (max_px * max_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bin(lat: f64, lon: f64, count: i64) -> SpatialBin {
        SpatialBin { lat, lon, count }
    }

    #[test]
    fn test_one_marker_per_bin() {
        let bins = vec![bin(42.96, -85.67, 5), bin(42.97, -85.66, 2)];
        let fig = build_map_chart(&bins);

        let trace = &fig["data"][0];
        assert_eq!(trace["type"], "scattermapbox");
        assert_eq!(trace["lat"].as_array().unwrap().len(), 2);
        assert_eq!(trace["lon"].as_array().unwrap().len(), 2);
        assert_eq!(trace["marker"]["size"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_color_domain_spans_counts() {
        let bins = vec![bin(42.96, -85.67, 5), bin(42.97, -85.66, 2)];
        let fig = build_map_chart(&bins);
        assert_eq!(fig["data"][0]["marker"]["cmin"], 2);
        assert_eq!(fig["data"][0]["marker"]["cmax"], 5);
    }

    #[test]
    fn test_empty_bins_render_placeholder() {
        let fig = build_map_chart(&[]);

        let trace = &fig["data"][0];
        assert_eq!(trace["lat"].as_array().unwrap().len(), 1);
        assert_eq!(trace["lat"][0], 42.96);
        assert_eq!(trace["lon"][0], -85.67);
    }

    #[test]
    fn test_view_state_is_client_owned_in_both_branches() {
        let populated = build_map_chart(&[bin(42.96, -85.67, 1)]);
        let placeholder = build_map_chart(&[]);
        assert_eq!(populated["layout"]["uirevision"], true);
        assert_eq!(placeholder["layout"]["uirevision"], true);
    }

    #[test]
    fn test_basemap_and_zoom_fixed() {
        for fig in [build_map_chart(&[]), build_map_chart(&[bin(42.9, -85.6, 3)])] {
            assert_eq!(fig["layout"]["mapbox"]["style"], "carto-positron");
            assert_eq!(fig["layout"]["mapbox"]["zoom"], 10);
            assert_eq!(fig["layout"]["mapbox"]["center"]["lat"], 42.96);
        }
    }

    #[test]
    fn test_margins_identical_in_both_branches() {
        let populated = build_map_chart(&[bin(42.9, -85.6, 3)]);
        let placeholder = build_map_chart(&[]);
        assert_eq!(populated["layout"]["margin"], placeholder["layout"]["margin"]);
    }

    #[test]
    fn test_marker_size_capped() {
        // With max count 50 and a 15px cap: sizeref = 2*50/225
        let bins = vec![bin(42.9, -85.6, 50), bin(42.91, -85.61, 10)];
        let fig = build_map_chart(&bins);
        let sizeref = fig["data"][0]["marker"]["sizeref"].as_f64().unwrap();
        assert!((sizeref - (100.0 / 225.0)).abs() < 1e-12);
    }
}
