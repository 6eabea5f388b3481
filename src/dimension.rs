//! The catalog of user-selectable dimensions.
//!
//! Each dimension maps a dropdown label to the SQL expression that
//! computes it from the raw crash columns, plus an upper bound used to
//! clip outliers before charting. The set is closed: dimension names
//! only ever originate from the dashboard's dropdowns, so the enum is
//! exhaustive by construction.

use crate::{CrashmapError, Result};
use std::fmt;
use std::str::FromStr;

/// One axis of analysis for the cross-tab heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    HourOfDay,
    DayOfWeek,
    Age,
    WeekOfYear,
}

impl Dimension {
    /// All selectable dimensions, in dropdown order.
    pub const ALL: [Dimension; 4] = [
        Dimension::WeekOfYear,
        Dimension::Age,
        Dimension::DayOfWeek,
        Dimension::HourOfDay,
    ];

    /// Display name, also the unique key used over the wire.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::HourOfDay => "Hour of Day",
            Dimension::DayOfWeek => "Day of Week",
            Dimension::Age => "Age",
            Dimension::WeekOfYear => "Week of Year",
        }
    }

    /// SQL expression computing this dimension from the raw columns.
    ///
    /// Driver age is bucketed by rounding to the nearest even number so
    /// adjacent single-year ages share a cell.
    pub fn sql_expr(self) -> &'static str {
        match self {
            Dimension::HourOfDay => "crash_hour",
            Dimension::DayOfWeek => "extract(dow from crash_date)",
            Dimension::Age => "round(driver_age / 2.0) * 2",
            Dimension::WeekOfYear => "extract(week from crash_date)",
        }
    }

    /// Upper bound for chart axes; values above it are dropped as
    /// outliers. The bound itself is retained.
    pub fn clip_limit(self) -> f64 {
        match self {
            Dimension::HourOfDay => 24.0,
            Dimension::DayOfWeek => 7.0,
            Dimension::Age => 100.0,
            Dimension::WeekOfYear => 52.0,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Dimension {
    type Err = CrashmapError;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| CrashmapError::UnknownDimension(s.to_string()))
    }
}
