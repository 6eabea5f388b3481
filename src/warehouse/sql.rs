//! SQL templates for the two warehouse queries.
//!
//! The only templating surface is the dimension → SQL-expression
//! mapping, which comes from the closed [`Dimension`] catalog. Clicked
//! cell values are never interpolated; they travel as bind parameters
//! (`$1`, `$2`).
//!
//! Both the grouping expressions and the filter comparisons are cast to
//! `double precision` so a value emitted by the cross-tab compares
//! exactly against the same value fed back by a cell click.

use crate::dimension::Dimension;

/// Fixed table holding one row per logged accident.
pub(crate) const CRASH_TABLE: &str = "gr_crash_data";

/// Cross-tab aggregate: accident counts grouped by two dimensions.
pub(crate) fn crosstab_sql(x: Dimension, y: Dimension) -> String {
    format!(
        "SELECT count(*) AS n, \
         CAST({x_expr} AS double precision) AS x_axis, \
         CAST({y_expr} AS double precision) AS y_axis \
         FROM {table} \
         GROUP BY 2, 3",
        x_expr = x.sql_expr(),
        y_expr = y.sql_expr(),
        table = CRASH_TABLE,
    )
}

/// Spatial aggregate: accident counts per 0.02-degree coordinate bin,
/// filtered to one cross-tab cell. `round(v / 2, 3) * 2` snaps a
/// coordinate to the fixed bin grid using the warehouse's native
/// rounding semantics, so bin labels are stable across queries.
pub(crate) fn spatial_sql(x: Dimension, y: Dimension) -> String {
    format!(
        "SELECT count(*) AS n, \
         CAST(round((latitude / 2)::numeric, 3) * 2 AS double precision) AS lat_bin, \
         CAST(round((longitude / 2)::numeric, 3) * 2 AS double precision) AS lon_bin \
         FROM {table} \
         WHERE CAST({x_expr} AS double precision) = $1 \
         AND CAST({y_expr} AS double precision) = $2 \
         GROUP BY 2, 3 \
         HAVING count(*) >= 1",
        x_expr = x.sql_expr(),
        y_expr = y.sql_expr(),
        table = CRASH_TABLE,
    )
}
