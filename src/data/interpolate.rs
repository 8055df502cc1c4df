//! Piecewise-linear resampling of tabulated data

use crate::error::{DiffsimError, Result};

/// `n` evenly spaced values from `start` to `stop`, both included
///
/// ```rust
/// use diffsim_rs::data::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// Linear interpolant through `(x, y)` samples
///
/// Outside the sampled range the first or last segment is extended, so a
/// table that stops short of the resampling interval still covers it. A
/// single sample yields a constant.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    /// # Errors
    ///
    /// - [`DiffsimError::EmptyInput`] for no samples
    /// - [`DiffsimError::LengthMismatch`] when `x` and `y` differ in length
    /// - [`DiffsimError::InvalidParameter`] unless `x` is finite and strictly increasing
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.is_empty() {
            return Err(DiffsimError::EmptyInput("interpolation samples"));
        }
        if x.len() != y.len() {
            return Err(DiffsimError::length_mismatch("interpolation x/y", x.len(), y.len()));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(DiffsimError::InvalidParameter(
                "interpolation abscissae must be finite".to_string(),
            ));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(DiffsimError::InvalidParameter(format!(
                "interpolation abscissae must increase strictly, x[{}] = {} then {}",
                i,
                x[i],
                x[i + 1]
            )));
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Interpolated value at `t`
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        if n == 1 {
            return self.y[0];
        }

        // Segment [x[i], x[i+1]] containing t, clamped to the end segments
        let i = self.x.partition_point(|&v| v <= t).clamp(1, n - 1) - 1;

        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let alpha = (t - x0) / (x1 - x0);
        y0 + alpha * (y1 - y0)
    }

    /// Values at every point of `at`
    pub fn resample(&self, at: &[f64]) -> Vec<f64> {
        at.iter().map(|&t| self.eval(t)).collect()
    }
}
