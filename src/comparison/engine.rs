//! Model/experiment comparison
//!
//! Calibration pairs a simulated profile with an experimental one: it finds
//! the alignment shift and measures the least-squares error of the unshifted
//! pair. The result is a plain value; applying the shift to other vectors
//! takes it explicitly, so one calibration never leaks into another.

use nalgebra::DVector;

use crate::comparison::shift::{find_shift, padded_at};
use crate::error::{DiffsimError, Result};

// =================================================================================================
// Least Squares
// =================================================================================================

/// Sum of squared elementwise differences
///
/// Symmetric in its arguments and zero for identical vectors.
///
/// ```rust
/// use diffsim_rs::comparison::least_squares;
/// use nalgebra::DVector;
///
/// let a = DVector::from_vec(vec![1.0, 0.5, 0.0]);
/// let b = DVector::from_vec(vec![1.0, 0.0, 0.0]);
/// assert_eq!(least_squares(&a, &b).unwrap(), 0.25);
/// ```
pub fn least_squares(a: &DVector<f64>, b: &DVector<f64>) -> Result<f64> {
    if a.len() != b.len() {
        return Err(DiffsimError::length_mismatch("least squares", a.len(), b.len()));
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| (y - x) * (y - x)).sum())
}

// =================================================================================================
// Shift Application
// =================================================================================================

/// Moves `vector` by `shift` grid points
///
/// - `shift > 0`: right shift, the vacated left cells become 1.0, the right
///   end is truncated
/// - `shift < 0`: left shift, the vacated right cells become 0.0, the left
///   end is truncated
/// - `shift == 0`: identity
///
/// # Errors
///
/// [`DiffsimError::InvalidParameter`] when `|shift| ≥ len` for a non-zero
/// shift: the result would hold no data from `vector`.
///
/// ```rust
/// use diffsim_rs::comparison::apply_shift;
/// use nalgebra::DVector;
///
/// let v = DVector::from_vec(vec![0.9, 0.6, 0.3, 0.1]);
/// assert_eq!(apply_shift(&v, 1).unwrap().as_slice(), &[1.0, 0.9, 0.6, 0.3]);
/// assert_eq!(apply_shift(&v, -2).unwrap().as_slice(), &[0.3, 0.1, 0.0, 0.0]);
/// ```
pub fn apply_shift(vector: &DVector<f64>, shift: isize) -> Result<DVector<f64>> {
    if shift == 0 {
        return Ok(vector.clone());
    }
    if shift.unsigned_abs() >= vector.len() {
        return Err(DiffsimError::InvalidParameter(format!(
            "shift {} is out of range for a profile of length {}",
            shift,
            vector.len()
        )));
    }

    let data = vector.as_slice();
    Ok(DVector::from_fn(vector.len(), |i, _| padded_at(data, i, shift)))
}

/// Least-squares error after moving `model` by `shift`
pub fn shifted_least_squares(model: &DVector<f64>, experiment: &DVector<f64>, shift: isize) -> Result<f64> {
    if model.len() != experiment.len() {
        return Err(DiffsimError::length_mismatch(
            "shifted least squares",
            model.len(),
            experiment.len(),
        ));
    }
    least_squares(&apply_shift(model, shift)?, experiment)
}

// =================================================================================================
// Calibration
// =================================================================================================

/// Outcome of calibrating a model profile against an experiment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Least-squares error of the **unshifted** model against the experiment
    pub least_squares: f64,

    /// Grid points the model must move right to line up with the experiment
    pub shift: isize,

    /// Length of the calibrated profiles
    pub len: usize,
}

impl Calibration {
    /// Applies the calibrated shift to another vector of the same length
    pub fn apply(&self, vector: &DVector<f64>) -> Result<DVector<f64>> {
        if vector.len() != self.len {
            return Err(DiffsimError::length_mismatch("calibrated shift", self.len, vector.len()));
        }
        apply_shift(vector, self.shift)
    }

    /// Least-squares error once the calibrated shift is applied to `model`
    pub fn shifted_least_squares(&self, model: &DVector<f64>, experiment: &DVector<f64>) -> Result<f64> {
        if model.len() != self.len {
            return Err(DiffsimError::length_mismatch("calibrated shift", self.len, model.len()));
        }
        shifted_least_squares(model, experiment, self.shift)
    }
}

/// Finds the alignment shift of `model` onto `experiment` and the unshifted error
///
/// # Errors
///
/// - [`DiffsimError::LengthMismatch`] when the profiles differ in length
/// - [`DiffsimError::EmptyInput`] when both are empty
///
/// # Example
///
/// ```rust
/// use diffsim_rs::comparison::calibrate;
/// use nalgebra::DVector;
///
/// let experiment = DVector::from_vec(vec![1.0, 1.0, 0.5, 0.0, 0.0]);
/// let model = DVector::from_vec(vec![1.0, 0.5, 0.0, 0.0, 0.0]);
///
/// let calibration = calibrate(&model, &experiment).unwrap();
/// assert_eq!(calibration.shift, 1);
/// assert_eq!(calibration.least_squares, 0.5);
///
/// let aligned = calibration.apply(&model).unwrap();
/// assert_eq!(aligned, experiment);
/// ```
pub fn calibrate(model: &DVector<f64>, experiment: &DVector<f64>) -> Result<Calibration> {
    if model.len() != experiment.len() {
        return Err(DiffsimError::length_mismatch(
            "model/experiment",
            model.len(),
            experiment.len(),
        ));
    }
    if model.is_empty() {
        return Err(DiffsimError::EmptyInput("model profile"));
    }

    let shift = find_shift(experiment, model)?;
    Ok(Calibration {
        least_squares: least_squares(model, experiment)?,
        shift,
        len: model.len(),
    })
}

// =================================================================================================
// Tests
// =================================================================================================
