//! Shift alignment by padded least-squares search
//!
//! Finds the integer number of grid points by which a target profile must be
//! moved to best match a reference profile. Moving the target exposes cells
//! at one end; these are filled with the physical boundary values of a
//! diffusion couple:
//!
//! - **left**: 1.0 (saturated source)
//! - **right**: 0.0 (depleted sink)
//!
//! # Definition
//!
//! For a shift `s`, the moved target is
//!
//! ```text
//! T_s[i] = T[i − s]   when 0 ≤ i − s < N
//!        = 1.0        when i − s < 0
//!        = 0.0        when i − s ≥ N
//! ```
//!
//! and the chosen shift minimises `Σ (R[i] − T_s[i])²` over
//! `−(N−1) ≤ s ≤ N−1`. Among equal errors the smallest `|s|` wins, and
//! `+s` wins over `−s`.
//!
//! The search is the exact brute-force scan, O(N²) per call. Grids in this
//! crate are a few hundred points, where the scan costs far less than the
//! simulation that produced the profile.

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};

/// Fill value for cells exposed on the left by a positive shift
pub const LEFT_PAD: f64 = 1.0;

/// Fill value for cells exposed on the right by a negative shift
pub const RIGHT_PAD: f64 = 0.0;

/// Value of `target` moved by `shift`, read at index `i`
#[inline]
pub(crate) fn padded_at(target: &[f64], i: usize, shift: isize) -> f64 {
    let source = i as isize - shift;
    if source < 0 {
        LEFT_PAD
    } else if source as usize >= target.len() {
        RIGHT_PAD
    } else {
        target[source as usize]
    }
}

/// Sum of squared differences between `reference` and `target` moved by `shift`
fn shifted_error(reference: &[f64], target: &[f64], shift: isize) -> f64 {
    reference
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let diff = r - padded_at(target, i, shift);
            diff * diff
        })
        .sum()
}

/// Candidate shifts in tie-break order: 0, +1, −1, +2, −2, ...
fn candidate_shifts(len: usize) -> impl Iterator<Item = isize> {
    let max = len.saturating_sub(1) as isize;
    std::iter::once(0).chain((1..=max).flat_map(|s| [s, -s]))
}

/// Finds the shift of `target` that best matches `reference`
///
/// A positive result means `target` must move right (towards higher
/// indices) to line up with `reference`.
///
/// # Errors
///
/// - [`DiffsimError::LengthMismatch`] when the vectors differ in length
/// - [`DiffsimError::EmptyInput`] when both are empty
///
/// # Example
///
/// ```rust
/// use diffsim_rs::comparison::find_shift;
/// use nalgebra::DVector;
///
/// let reference = DVector::from_vec(vec![1.0, 1.0, 1.0, 0.5, 0.0, 0.0]);
/// let target = DVector::from_vec(vec![1.0, 0.5, 0.0, 0.0, 0.0, 0.0]);
///
/// assert_eq!(find_shift(&reference, &target).unwrap(), 2);
/// assert_eq!(find_shift(&target, &reference).unwrap(), -2);
/// ```
pub fn find_shift(reference: &DVector<f64>, target: &DVector<f64>) -> Result<isize> {
    if reference.len() != target.len() {
        return Err(DiffsimError::length_mismatch(
            "shift reference/target",
            reference.len(),
            target.len(),
        ));
    }
    if reference.is_empty() {
        return Err(DiffsimError::EmptyInput("shift reference"));
    }

    let (reference, target) = (reference.as_slice(), target.as_slice());

    let mut best_shift = 0;
    let mut best_error = f64::INFINITY;
    for shift in candidate_shifts(reference.len()) {
        let error = shifted_error(reference, target, shift);
        // Strict comparison keeps the earliest candidate on ties
        if error < best_error {
            best_error = error;
            best_shift = shift;
        }
    }

    Ok(best_shift)
}

// =================================================================================================
// Tests
// =================================================================================================
