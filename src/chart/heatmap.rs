//! Cross-tab heatmap figure builder.

use serde_json::{json, Value};

use crate::chart::grid::CrossTabGrid;
use crate::chart::{sunset_colorscale, tight_margin};
use crate::dimension::Dimension;
use crate::warehouse::CrossTabRow;

/// Fixed label for the color dimension.
const COUNT_LABEL: &str = "Accident Count";

/// Build the heatmap figure for a cross-tab result.
///
/// Rows beyond either dimension's clip limit are dropped, the rest are
/// pivoted into a dense grid, and the grid becomes a continuous-color
/// heatmap trace. The color scale legend is hidden; the domain is the
/// grid's [min, max]. Defined for empty input: the grid degenerates to
/// 0x0 and zmin == zmax == 0 (no division happens anywhere).
pub fn build_crosstab_chart(rows: &[CrossTabRow], x_dim: Dimension, y_dim: Dimension) -> Value {
    let grid = CrossTabGrid::from_rows(rows, x_dim.clip_limit(), y_dim.clip_limit());

    json!({
        "data": [{
            "type": "heatmap",
            "x": grid.x_labels,
            "y": grid.y_labels,
            "z": grid.cells,
            "colorscale": sunset_colorscale(),
            "zmin": grid.min(),
            "zmax": grid.max(),
            "showscale": false,
            "hovertemplate": format!(
                "{x}: %{{x}}<br>{y}: %{{y}}<br>{count}: %{{z}}<extra></extra>",
                x = x_dim.label(),
                y = y_dim.label(),
                count = COUNT_LABEL,
            ),
        }],
        "layout": {
            "xaxis": { "title": { "text": x_dim.label() } },
            "yaxis": { "title": { "text": y_dim.label() } },
            "margin": tight_margin(),
        },
    })
}
