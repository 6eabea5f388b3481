//! Data access layer for the crash warehouse.
//!
//! The warehouse module provides a pluggable interface for executing
//! the dashboard's two aggregate queries against a SQL warehouse and
//! returning typed row sets.
//!
//! # Architecture
//!
//! All backends implement the [`Warehouse`] trait, which provides:
//! - Cross-tab aggregation over two catalog dimensions
//! - Spatial binning filtered to one clicked cross-tab cell
//! - Whole-connection replacement on failure (never in-place repair)
//!
//! # Example
//!
//! ```rust,ignore
//! use crashmap::warehouse::{Warehouse, WarehouseConfig, PostgresWarehouse};
//! use crashmap::Dimension;
//!
//! let mut wh = PostgresWarehouse::connect(WarehouseConfig::from_env()?)?;
//! let rows = wh.fetch_crosstab(Dimension::WeekOfYear, Dimension::HourOfDay)?;
//! ```

use crate::dimension::Dimension;
use crate::Result;
use serde::Serialize;

pub mod config;
pub mod postgres;
mod sql;

pub use config::WarehouseConfig;
pub use postgres::PostgresWarehouse;
pub(crate) use sql::{crosstab_sql, spatial_sql};

/// One row of the cross-tab aggregate: how many accidents fall in the
/// (x, y) dimension combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTabRow {
    pub x: f64,
    pub y: f64,
    pub count: i64,
}

/// One spatial bin: accident count inside a fixed 0.02-degree grid
/// cell. The query's HAVING clause guarantees `count >= 1`; empty bins
/// are never returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpatialBin {
    pub lat: f64,
    pub lon: f64,
    pub count: i64,
}

/// Trait for warehouse backends.
///
/// Methods take `&mut self` because a failed query may leave the
/// underlying session unusable; callers recover by calling
/// [`Warehouse::reconnect`], which replaces the connection wholesale.
/// No retry happens inside this layer.
pub trait Warehouse {
    /// Run the cross-tab aggregate: accident counts grouped by the two
    /// dimensions' SQL expressions. The full result set is materialized;
    /// no ordering is guaranteed (ordering happens in the pivot).
    fn fetch_crosstab(&mut self, x: Dimension, y: Dimension) -> Result<Vec<CrossTabRow>>;

    /// Run the spatial aggregate: accident counts per coordinate bin,
    /// restricted to rows whose dimension expressions equal the clicked
    /// cross-tab cell values.
    ///
    /// A click value matching zero rows yields an empty Vec, never an
    /// error.
    fn fetch_spatial_bins(
        &mut self,
        x: Dimension,
        x_value: f64,
        y: Dimension,
        y_value: f64,
    ) -> Result<Vec<SpatialBin>>;

    /// Replace the underlying connection with a fresh one.
    fn reconnect(&mut self) -> Result<()>;
}
