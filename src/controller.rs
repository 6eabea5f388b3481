//! Event handlers binding queries to charts.
//!
//! Two handlers mirror the dashboard's two event sources: an axis
//! dropdown change rebuilds the heatmap, a heatmap-cell click rebuilds
//! the map. Both are pure functions of (control values, click payload,
//! warehouse handle): no state is retained between invocations beyond
//! the shared connection, so identical inputs over an unchanged dataset
//! produce bit-identical figures.

use serde_json::Value;
use tracing::warn;

use crate::chart::{build_crosstab_chart, build_map_chart};
use crate::dimension::Dimension;
use crate::warehouse::Warehouse;
use crate::Result;

/// The cross-tab cell the user clicked: the discrete grouping values of
/// the current x and y dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellClick {
    pub x: f64,
    pub y: f64,
}

/// Axis-change handler: fetch the cross-tab and build the heatmap.
///
/// A failed fetch is recovered once by replacing the connection and
/// retrying; a second failure propagates to the hosting layer. The
/// retry is invisible to the user apart from a log line.
pub fn crosstab_view<W: Warehouse + ?Sized>(
    warehouse: &mut W,
    x: Dimension,
    y: Dimension,
) -> Result<Value> {
    let rows = match warehouse.fetch_crosstab(x, y) {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "cross-tab query failed, reconnecting");
            warehouse.reconnect()?;
            warehouse.fetch_crosstab(x, y)?
        }
    };

    Ok(build_crosstab_chart(&rows, x, y))
}

/// Cell-click handler: fetch spatial bins for the clicked cell and
/// build the map.
///
/// No click yet means the placeholder map, without touching the
/// warehouse. A click matching zero rows yields zero bins, which also
/// renders as the placeholder.
pub fn map_view<W: Warehouse + ?Sized>(
    warehouse: &mut W,
    click: Option<CellClick>,
    x: Dimension,
    y: Dimension,
) -> Result<Value> {
    let bins = match click {
        None => Vec::new(),
        Some(cell) => warehouse.fetch_spatial_bins(x, cell.x, y, cell.y)?,
    };

    Ok(build_map_chart(&bins))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{CrossTabRow, SpatialBin};
    use crate::CrashmapError;
    use std::collections::VecDeque;

    /// Scripted warehouse: pops one pre-arranged outcome per fetch and
    /// counts reconnects.
    struct ScriptedWarehouse {
        crosstab_outcomes: VecDeque<Result<Vec<CrossTabRow>>>,
        spatial_outcomes: VecDeque<Result<Vec<SpatialBin>>>,
        reconnects: usize,
        crosstab_calls: usize,
        spatial_calls: usize,
    }

    impl ScriptedWarehouse {
        fn new() -> Self {
            Self {
                crosstab_outcomes: VecDeque::new(),
                spatial_outcomes: VecDeque::new(),
                reconnects: 0,
                crosstab_calls: 0,
                spatial_calls: 0,
            }
        }
    }

    impl Warehouse for ScriptedWarehouse {
        fn fetch_crosstab(&mut self, _x: Dimension, _y: Dimension) -> Result<Vec<CrossTabRow>> {
            self.crosstab_calls += 1;
            self.crosstab_outcomes
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn fetch_spatial_bins(
            &mut self,
            _x: Dimension,
            _x_value: f64,
            _y: Dimension,
            _y_value: f64,
        ) -> Result<Vec<SpatialBin>> {
            self.spatial_calls += 1;
            self.spatial_outcomes
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        fn reconnect(&mut self) -> Result<()> {
            self.reconnects += 1;
            Ok(())
        }
    }

    fn query_err() -> CrashmapError {
        CrashmapError::Query("session expired".to_string())
    }

    #[test]
    fn test_axis_change_happy_path_does_not_reconnect() {
        let mut wh = ScriptedWarehouse::new();
        wh.crosstab_outcomes
            .push_back(Ok(vec![CrossTabRow { x: 1.0, y: 2.0, count: 3 }]));

        let fig = crosstab_view(&mut wh, Dimension::Age, Dimension::HourOfDay).unwrap();

        assert_eq!(wh.reconnects, 0);
        assert_eq!(wh.crosstab_calls, 1);
        assert_eq!(fig["data"][0]["zmax"], 3);
    }

    #[test]
    fn test_reconnect_and_retry_exactly_once() {
        let mut wh = ScriptedWarehouse::new();
        wh.crosstab_outcomes.push_back(Err(query_err()));
        wh.crosstab_outcomes
            .push_back(Ok(vec![CrossTabRow { x: 4.0, y: 5.0, count: 8 }]));

        let fig = crosstab_view(&mut wh, Dimension::WeekOfYear, Dimension::DayOfWeek).unwrap();

        // The chart comes from the second call after one reconnect
        assert_eq!(wh.reconnects, 1);
        assert_eq!(wh.crosstab_calls, 2);
        assert_eq!(fig["data"][0]["zmax"], 8);
    }

    #[test]
    fn test_second_failure_propagates() {
        let mut wh = ScriptedWarehouse::new();
        wh.crosstab_outcomes.push_back(Err(query_err()));
        wh.crosstab_outcomes.push_back(Err(query_err()));

        let result = crosstab_view(&mut wh, Dimension::Age, Dimension::Age);

        assert!(result.is_err());
        assert_eq!(wh.reconnects, 1);
        assert_eq!(wh.crosstab_calls, 2);
    }

    #[test]
    fn test_axis_change_is_idempotent() {
        let rows = vec![
            CrossTabRow { x: 1.0, y: 1.0, count: 2 },
            CrossTabRow { x: 2.0, y: 1.0, count: 4 },
        ];
        let mut wh = ScriptedWarehouse::new();
        wh.crosstab_outcomes.push_back(Ok(rows.clone()));
        wh.crosstab_outcomes.push_back(Ok(rows));

        let first = crosstab_view(&mut wh, Dimension::Age, Dimension::HourOfDay).unwrap();
        let second = crosstab_view(&mut wh, Dimension::Age, Dimension::HourOfDay).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_no_click_skips_the_warehouse() {
        let mut wh = ScriptedWarehouse::new();

        let fig = map_view(&mut wh, None, Dimension::Age, Dimension::HourOfDay).unwrap();

        assert_eq!(wh.spatial_calls, 0);
        assert_eq!(fig["data"][0]["lat"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_click_with_zero_bins_renders_placeholder() {
        let mut wh = ScriptedWarehouse::new();
        wh.spatial_outcomes.push_back(Ok(Vec::new()));

        let click = Some(CellClick { x: 3.0, y: 14.0 });
        let fig = map_view(&mut wh, click, Dimension::DayOfWeek, Dimension::WeekOfYear).unwrap();

        assert_eq!(wh.spatial_calls, 1);
        assert_eq!(fig["data"][0]["lat"][0], 42.96);
    }

    #[test]
    fn test_click_failure_propagates_without_retry() {
        let mut wh = ScriptedWarehouse::new();
        wh.spatial_outcomes.push_back(Err(query_err()));

        let click = Some(CellClick { x: 3.0, y: 14.0 });
        let result = map_view(&mut wh, click, Dimension::Age, Dimension::HourOfDay);

        assert!(result.is_err());
        assert_eq!(wh.reconnects, 0);
        assert_eq!(wh.spatial_calls, 1);
    }
}
