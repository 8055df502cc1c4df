//! Parameter ranges and their Cartesian product
//!
//! A sweep evaluates every pair of an effective valence z* (rows) and a
//! diffusivity multiplier Cv/Cve (columns). Cells are numbered in the same
//! column-major order nalgebra stores a `DMatrix` in, so cell `k` of the grid
//! is element `k` of the error surface's storage.

use crate::error::{DiffsimError, Result};

/// Evenly spaced values in `[start, stop)` with spacing `step`
///
/// ```rust
/// use diffsim_rs::search::arange;
///
/// assert_eq!(arange(0.0, 1.0, 0.25).unwrap(), vec![0.0, 0.25, 0.5, 0.75]);
/// assert!(arange(0.0, 1.0, 0.0).is_err());
/// ```
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(DiffsimError::InvalidParameter(format!(
            "range step must be positive and finite, got {step}"
        )));
    }
    if !(start.is_finite() && stop.is_finite()) {
        return Err(DiffsimError::InvalidParameter(format!(
            "range bounds must be finite, got [{start}, {stop})"
        )));
    }

    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}

/// One cell of a [`ParameterGrid`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    /// Row parameter (z*)
    pub a: f64,
    /// Column parameter (Cv/Cve)
    pub b: f64,
}

/// Cartesian product of two non-empty parameter ranges
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    rows: Vec<f64>,
    cols: Vec<f64>,
}

impl ParameterGrid {
    /// Builds the grid, rejecting empty or non-finite ranges
    pub fn new(rows: Vec<f64>, cols: Vec<f64>) -> Result<Self> {
        if rows.is_empty() {
            return Err(DiffsimError::EmptyInput("row parameter range"));
        }
        if cols.is_empty() {
            return Err(DiffsimError::EmptyInput("column parameter range"));
        }
        if rows.iter().chain(cols.iter()).any(|v| !v.is_finite()) {
            return Err(DiffsimError::InvalidParameter(
                "parameter ranges must be finite".to_string(),
            ));
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    pub fn cols(&self) -> &[f64] {
        &self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Never true: both ranges are non-empty by construction
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell `k` in column-major order
    pub fn cell(&self, k: usize) -> Option<GridCell> {
        if k >= self.len() {
            return None;
        }
        let nrows = self.rows.len();
        let (row, col) = (k % nrows, k / nrows);
        Some(GridCell {
            row,
            col,
            a: self.rows[row],
            b: self.cols[col],
        })
    }

    /// All cells in column-major order
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.len()).filter_map(move |k| self.cell(k))
    }
}
