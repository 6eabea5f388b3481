//! Pivot of cross-tab rows into a dense 2-D grid.

use crate::warehouse::CrossTabRow;

/// Dense count grid keyed by (y label, x label).
///
/// Labels are the distinct clipped values observed in the input, sorted
/// ascending; `cells[row][col]` is the count for
/// (`y_labels[row]`, `x_labels[col]`), 0 where the combination never
/// occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTabGrid {
    pub x_labels: Vec<f64>,
    pub y_labels: Vec<f64>,
    pub cells: Vec<Vec<i64>>,
}

impl CrossTabGrid {
    /// Clip rows to the dimension limits, then pivot into a dense grid.
    ///
    /// Clipping is exclusive above the limit: a value equal to the
    /// limit is retained. Rows sharing a (x, y) combination are summed.
    /// Empty input yields a 0x0 grid.
    pub fn from_rows(rows: &[CrossTabRow], x_limit: f64, y_limit: f64) -> Self {
        let kept: Vec<&CrossTabRow> = rows
            .iter()
            .filter(|r| r.x <= x_limit && r.y <= y_limit)
            .collect();

        let x_labels = distinct_sorted(kept.iter().map(|r| r.x));
        let y_labels = distinct_sorted(kept.iter().map(|r| r.y));

        let mut cells = vec![vec![0i64; x_labels.len()]; y_labels.len()];
        for row in kept {
            // Labels were built from the kept rows, so both lookups hit.
            let col = index_of(&x_labels, row.x);
            let line = index_of(&y_labels, row.y);
            if let (Some(col), Some(line)) = (col, line) {
                cells[line][col] += row.count;
            }
        }

        Self { x_labels, y_labels, cells }
    }

    /// Smallest cell value; 0 for an empty grid.
    pub fn min(&self) -> i64 {
        self.cells
            .iter()
            .flatten()
            .copied()
            .min()
            .unwrap_or(0)
    }

    /// Largest cell value; 0 for an empty grid.
    pub fn max(&self) -> i64 {
        self.cells
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
    }
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

fn index_of(labels: &[f64], value: f64) -> Option<usize> {
    labels.binary_search_by(|l| l.total_cmp(&value)).ok()
}
