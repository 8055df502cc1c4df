//! Error surface of a parameter sweep
//!
//! Holds the summed least-squares error for every (z*, Cv/Cve) cell together
//! with the list of cells whose simulation diverged. Unstable cells keep the
//! value `0.0` in the matrix; [`ErrorSurface::is_unstable`] is the only
//! reliable way to tell them apart from a perfect fit.

use nalgebra::DMatrix;

use crate::error::{DiffsimError, Result};

/// Sweep result over a row parameter (z*) and a column parameter (Cv/Cve)
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSurface {
    rows: Vec<f64>,
    cols: Vec<f64>,
    values: DMatrix<f64>,
    unstable: Vec<(usize, usize)>,
}

impl ErrorSurface {
    /// Assembles a surface, checking every dimension against the axes
    ///
    /// `unstable` is sorted and deduplicated; its cells are zeroed in
    /// `values`.
    pub fn new(
        rows: Vec<f64>,
        cols: Vec<f64>,
        mut values: DMatrix<f64>,
        mut unstable: Vec<(usize, usize)>,
    ) -> Result<Self> {
        if values.nrows() != rows.len() {
            return Err(DiffsimError::length_mismatch("surface rows", rows.len(), values.nrows()));
        }
        if values.ncols() != cols.len() {
            return Err(DiffsimError::length_mismatch("surface columns", cols.len(), values.ncols()));
        }
        if let Some(&(i, j)) = unstable.iter().find(|(i, j)| *i >= rows.len() || *j >= cols.len()) {
            return Err(DiffsimError::InvalidParameter(format!(
                "unstable cell ({i}, {j}) outside a {}x{} surface",
                rows.len(),
                cols.len()
            )));
        }

        unstable.sort_unstable();
        unstable.dedup();
        for &(i, j) in &unstable {
            values[(i, j)] = 0.0;
        }

        Ok(Self {
            rows,
            cols,
            values,
            unstable,
        })
    }

    /// Row parameter values (z*)
    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    /// Column parameter values (Cv/Cve)
    pub fn cols(&self) -> &[f64] {
        &self.cols
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Error at `(row, col)`, `None` for unstable or out-of-range cells
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows.len() || col >= self.cols.len() || self.is_unstable(row, col) {
            return None;
        }
        Some(self.values[(row, col)])
    }

    /// Cells whose simulation diverged, sorted by (row, col)
    pub fn unstable_cells(&self) -> &[(usize, usize)] {
        &self.unstable
    }

    pub fn unstable_count(&self) -> usize {
        self.unstable.len()
    }

    pub fn is_unstable(&self, row: usize, col: usize) -> bool {
        self.unstable.binary_search(&(row, col)).is_ok()
    }

    // ==================== Analysis ====================

    /// Stable cell with the smallest finite error, as `(row, col, error)`
    ///
    /// Ties resolve to the first cell in column-major order.
    pub fn argmin(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for col in 0..self.cols.len() {
            for row in 0..self.rows.len() {
                let Some(value) = self.get(row, col) else {
                    continue;
                };
                if !value.is_finite() {
                    continue;
                }
                if best.is_none_or(|(_, _, b)| value < b) {
                    best = Some((row, col, value));
                }
            }
        }
        best
    }

    /// Elementwise product with another surface over the same axes
    ///
    /// Used to merge forward- and reverse-bias sweeps into one map. A cell
    /// unstable in either input is unstable in the result.
    pub fn combine(&self, other: &ErrorSurface) -> Result<ErrorSurface> {
        if self.rows.len() != other.rows.len() {
            return Err(DiffsimError::length_mismatch(
                "combined surface rows",
                self.rows.len(),
                other.rows.len(),
            ));
        }
        if self.cols.len() != other.cols.len() {
            return Err(DiffsimError::length_mismatch(
                "combined surface columns",
                self.cols.len(),
                other.cols.len(),
            ));
        }

        let values = self.values.component_mul(&other.values);
        let mut unstable = self.unstable.clone();
        unstable.extend_from_slice(&other.unstable);

        ErrorSurface::new(self.rows.clone(), self.cols.clone(), values, unstable)
    }

    /// Longest contiguous run of stable columns in `row` with error below `threshold`
    ///
    /// Returns inclusive column bounds `(first, last)`. The first run wins
    /// between runs of equal length. Used to put error bars on Cv/Cve at the
    /// best-fit z*.
    pub fn row_bounds_below(&self, row: usize, threshold: f64) -> Option<(usize, usize)> {
        if row >= self.rows.len() {
            return None;
        }

        let mut best: Option<(usize, usize)> = None;
        let mut start: Option<usize> = None;

        for col in 0..=self.cols.len() {
            let inside = col < self.cols.len() && self.get(row, col).is_some_and(|v| v < threshold);
            match (inside, start) {
                (true, None) => start = Some(col),
                (false, Some(first)) => {
                    let last = col - 1;
                    if best.is_none_or(|(b0, b1)| last - first > b1 - b0) {
                        best = Some((first, last));
                    }
                    start = None;
                }
                _ => {}
            }
        }
        best
    }
}

/// Index of the value closest to `target`
///
/// Ties resolve to the lower index. `None` for an empty slice.
///
/// ```rust
/// use diffsim_rs::search::nearest_index;
///
/// assert_eq!(nearest_index(&[1.0, 2.0, 3.0], 2.4), Some(1));
/// assert_eq!(nearest_index(&[], 2.4), None);
/// ```
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .fold(None, |best: Option<(usize, f64)>, (i, v)| {
            let distance = (v - target).abs();
            match best {
                Some((_, d)) if d <= distance => best,
                _ => Some((i, distance)),
            }
        })
        .map(|(i, _)| i)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(values: &[&[f64]], unstable: Vec<(usize, usize)>) -> ErrorSurface {
        let nrows = values.len();
        let ncols = values[0].len();
        let m = DMatrix::from_fn(nrows, ncols, |i, j| values[i][j]);
        ErrorSurface::new(
            (0..nrows).map(|i| i as f64).collect(),
            (0..ncols).map(|j| j as f64 * 0.5).collect(),
            m,
            unstable,
        )
        .unwrap()
    }

    #[test]
    fn test_new_checks_shape() {
        let m = DMatrix::zeros(2, 3);
        assert!(matches!(
            ErrorSurface::new(vec![0.0], vec![0.0, 1.0, 2.0], m.clone(), vec![]),
            Err(DiffsimError::LengthMismatch { .. })
        ));
        assert!(matches!(
            ErrorSurface::new(vec![0.0, 1.0], vec![0.0, 1.0, 2.0], m, vec![(2, 0)]),
            Err(DiffsimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_unstable_cells_are_zeroed_and_flagged() {
        let s = surface(&[&[1.0, 2.0], &[3.0, 4.0]], vec![(1, 0), (1, 0)]);
        assert_eq!(s.unstable_count(), 1);
        assert!(s.is_unstable(1, 0));
        assert_eq!(s.values()[(1, 0)], 0.0);
        assert_eq!(s.get(1, 0), None);
        assert_eq!(s.get(1, 1), Some(4.0));
        assert_eq!(s.get(5, 5), None);
    }

    #[test]
    fn test_argmin_skips_unstable_cells() {
        let s = surface(&[&[5.0, 2.0], &[9.0, 7.0]], vec![(0, 1)]);
        // (0, 1) holds 0.0 after zeroing but is unstable
        assert_eq!(s.argmin(), Some((0, 0, 5.0)));

        let all_unstable = surface(&[&[1.0]], vec![(0, 0)]);
        assert_eq!(all_unstable.argmin(), None);
    }

    #[test]
    fn test_combine_multiplies_and_merges_unstable() {
        let forward = surface(&[&[2.0, 3.0], &[4.0, 5.0]], vec![(0, 0)]);
        let reverse = surface(&[&[10.0, 0.5], &[0.25, 2.0]], vec![(1, 1)]);

        let combined = forward.combine(&reverse).unwrap();

        assert_eq!(combined.unstable_cells(), &[(0, 0), (1, 1)]);
        assert_eq!(combined.get(0, 1), Some(1.5));
        assert_eq!(combined.get(1, 0), Some(1.0));
        assert_eq!(combined.argmin(), Some((1, 0, 1.0)));
    }

    #[test]
    fn test_combine_rejects_shape_mismatch() {
        let a = surface(&[&[1.0, 2.0]], vec![]);
        let b = surface(&[&[1.0, 2.0], &[3.0, 4.0]], vec![]);
        assert!(matches!(a.combine(&b), Err(DiffsimError::LengthMismatch { .. })));
    }

    #[test]
    fn test_row_bounds_pick_longest_run() {
        let s = surface(&[&[0.1, 5.0, 0.2, 0.3, 0.1, 9.0, 0.1]], vec![]);
        assert_eq!(s.row_bounds_below(0, 1.0), Some((2, 4)));
        assert_eq!(s.row_bounds_below(0, 0.05), None);
        assert_eq!(s.row_bounds_below(3, 1.0), None);
    }

    #[test]
    fn test_row_bounds_break_at_unstable_cells() {
        let s = surface(&[&[0.1, 0.1, 0.1, 0.1, 0.1]], vec![(0, 2)]);
        assert_eq!(s.row_bounds_below(0, 1.0), Some((0, 1)));
    }

    #[test]
    fn test_nearest_index_ties_to_lower() {
        assert_eq!(nearest_index(&[1.0, 3.0], 2.0), Some(0));
        assert_eq!(nearest_index(&[f64::NAN, 3.0], 0.0), Some(1));
    }
}
