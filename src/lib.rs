/*!
# crashmap - Grand Rapids traffic-accident dashboard

An interactive web dashboard over the City of Grand Rapids crash-data
warehouse. A heatmap cross-tabulates accident counts over two
user-selected dimensions (hour of day, day of week, driver age, week of
year); clicking a heatmap cell shows spatially-binned accident
locations on a street map.

## Architecture

The crate is a thin orchestration layer:

- **SQL portion** → templated aggregate queries issued through the
  [`warehouse`] layer (pg-wire client, one shared connection)
- **Reshape portion** → the [`chart`] layer pivots tabular results into
  a dense grid and emits Plotly figure JSON
- **Interaction portion** → the [`controller`] re-runs query + chart
  whenever a dropdown changes or a heatmap cell is clicked

## Core Components

- [`dimension`] - The closed catalog of selectable dimensions
- [`warehouse`] - Data access layer and connection management
- [`chart`] - Chart specification builders (heatmap, map)
- [`controller`] - Event handlers binding the layers together
*/

pub mod chart;
pub mod controller;
pub mod dimension;
pub mod warehouse;

// Re-export key types for convenience
pub use controller::CellClick;
pub use dimension::Dimension;
pub use warehouse::{CrossTabRow, SpatialBin, Warehouse};

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum CrashmapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Chart error: {0}")]
    Chart(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CrashmapError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
