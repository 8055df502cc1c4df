//! Fixed-value (Dirichlet) domain ends
//!
//! # Convention
//!
//! The two end points of the profile are held at their initial values for
//! the whole run. For a diffusion couple this is the saturated source on the
//! left and the depleted sink on the right; no flux enters or leaves through
//! the ends beyond what those fixed values imply.

use std::fmt;

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};

// =================================================================================================
// Fixed Boundaries
// =================================================================================================

/// Values held at the two ends of a 1-D profile
///
/// # Examples
///
/// ```rust
/// use diffsim_rs::solver::FixedBoundaries;
/// use nalgebra::DVector;
///
/// let initial = DVector::from_vec(vec![1.0, 1.0, 0.0, 0.0]);
/// let ends = FixedBoundaries::from_profile(&initial).unwrap();
///
/// let mut drifted = DVector::from_vec(vec![0.9, 0.8, 0.1, 0.2]);
/// ends.apply(&mut drifted);
/// assert_eq!(drifted[0], 1.0);
/// assert_eq!(drifted[3], 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedBoundaries {
    /// Value at index 0
    pub left: f64,

    /// Value at the last index
    pub right: f64,
}

impl FixedBoundaries {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Takes the end values of an initial profile
    pub fn from_profile(profile: &DVector<f64>) -> Result<Self> {
        match (profile.iter().next(), profile.iter().last()) {
            (Some(&left), Some(&right)) => Ok(Self { left, right }),
            _ => Err(DiffsimError::EmptyInput("initial profile")),
        }
    }

    /// Writes the fixed values into the ends of `profile`
    ///
    /// A single-point profile takes the left value.
    #[inline]
    pub fn apply(&self, profile: &mut DVector<f64>) {
        let n = profile.len();
        if n == 0 {
            return;
        }
        profile[n - 1] = self.right;
        profile[0] = self.left;
    }
}

impl fmt::Display for FixedBoundaries {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "C(0) = {}, C(L) = {}", self.left, self.right)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
