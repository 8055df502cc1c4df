//! Material property tables
//!
//! Diffusivity D(C) and resistivity R(C) are supplied as vectors sampled
//! uniformly over the normalised concentration interval [0, 1]. Sample `i`
//! of an `n`-sample table sits at concentration `i / (n - 1)`.
//!
//! The tables are indexed by **local concentration**, not by position, so
//! their length is independent of the spatial grid.

use std::ops::RangeInclusive;

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};

/// Diffusivity and resistivity sampled over normalised concentration
///
/// # Invariants
///
/// - Both vectors are non-empty
/// - Both vectors have the same length (same concentration sampling)
///
/// Both are checked by [`MaterialProperties::new`], so every value of this
/// type that exists satisfies them.
///
/// # Sharing
///
/// A sweep wraps one instance in an `Arc` and lets every worker read it.
/// Nothing in the crate mutates a `MaterialProperties` after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialProperties {
    diffusivity: DVector<f64>,
    resistivity: DVector<f64>,
}

impl MaterialProperties {
    /// Builds the tables, rejecting empty or mismatched inputs
    pub fn new(diffusivity: DVector<f64>, resistivity: DVector<f64>) -> Result<Self> {
        if diffusivity.is_empty() {
            return Err(DiffsimError::EmptyInput("diffusivity vector"));
        }
        if resistivity.is_empty() {
            return Err(DiffsimError::EmptyInput("resistivity vector"));
        }
        if diffusivity.len() != resistivity.len() {
            return Err(DiffsimError::length_mismatch(
                "diffusivity/resistivity",
                diffusivity.len(),
                resistivity.len(),
            ));
        }
        Ok(Self {
            diffusivity,
            resistivity,
        })
    }

    /// Builds the tables from plain slices
    pub fn from_slices(diffusivity: &[f64], resistivity: &[f64]) -> Result<Self> {
        Self::new(
            DVector::from_row_slice(diffusivity),
            DVector::from_row_slice(resistivity),
        )
    }

    /// Number of concentration samples in each table
    #[inline]
    pub fn samples(&self) -> usize {
        self.diffusivity.len()
    }

    #[inline]
    pub fn diffusivity(&self) -> &DVector<f64> {
        &self.diffusivity
    }

    #[inline]
    pub fn resistivity(&self) -> &DVector<f64> {
        &self.resistivity
    }

    /// Largest diffusivity in the table, before any Cv/Cve scaling
    pub fn max_diffusivity(&self) -> f64 {
        self.diffusivity.max()
    }

    /// Returns a copy with the diffusivity multiplied by `cv_factor`
    ///
    /// The resistivity is left untouched.
    pub fn with_diffusivity_factor(&self, cv_factor: f64) -> Self {
        Self {
            diffusivity: &self.diffusivity * cv_factor,
            resistivity: self.resistivity.clone(),
        }
    }

    /// Maps a concentration to the nearest table sample
    ///
    /// Returns `None` when the concentration is NaN or rounds to a sample
    /// outside the table, i.e. lies further than half a sample spacing
    /// outside [0, 1]. The explicit solver treats `None` as divergence.
    #[inline]
    pub fn index_of(&self, concentration: f64) -> Option<usize> {
        lookup_index(concentration, self.samples())
    }

    /// Concentrations that map onto a table sample
    ///
    /// Half a sample spacing either side of [0, 1]. A single-sample table
    /// covers every finite concentration.
    pub fn covered_range(&self) -> RangeInclusive<f64> {
        match self.samples() {
            1 => f64::MIN..=f64::MAX,
            n => {
                let half = 0.5 / (n - 1) as f64;
                -half..=1.0 + half
            }
        }
    }

    /// dD/dC at sample `index`, in units of diffusivity per unit concentration
    #[inline]
    pub fn diffusivity_slope(&self, index: usize) -> f64 {
        table_slope(&self.diffusivity, index)
    }

    /// dR/dC at sample `index`, in units of resistivity per unit concentration
    #[inline]
    pub fn resistivity_slope(&self, index: usize) -> f64 {
        table_slope(&self.resistivity, index)
    }
}

/// Nearest-sample index for a concentration over an `samples`-point table
#[inline]
pub(crate) fn lookup_index(concentration: f64, samples: usize) -> Option<usize> {
    if !concentration.is_finite() {
        return None;
    }
    let scaled = (concentration * (samples - 1) as f64).round();
    if scaled < 0.0 || scaled >= samples as f64 {
        return None;
    }
    Some(scaled as usize)
}

/// Finite-difference slope of a table with respect to concentration
///
/// Central difference in the interior, one-sided at the ends. A single-sample
/// table has no slope.
#[inline]
fn table_slope(values: &DVector<f64>, index: usize) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let left = if index == 0 { index } else { index - 1 };
    let right = if index == n - 1 { index } else { index + 1 };

    // Samples are 1/(n-1) apart in concentration
    (values[right] - values[left]) / (right - left) as f64 * (n - 1) as f64
}

// =================================================================================================
// Tests
// =================================================================================================
