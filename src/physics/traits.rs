//! Transport model trait
//!
//! This module defines the seam between physics and numerics:
//! - `TransportModel`: evaluates the right-hand side dC/dt of a 1-D
//!   concentration profile
//! - `Divergence`: what a model reports when the profile has left the range
//!   it can evaluate
//!
//! The model knows the equations (diffusion, electromigration drift, material
//! lookup). The solver knows how to march them through time. Keeping the two
//! apart lets the same explicit integrator run any 1-D transport model.

use std::ops::RangeInclusive;

use nalgebra::DVector;

// =================================================================================================
// Divergence
// =================================================================================================

/// Location and value of the first grid point a model could not evaluate
///
/// The solver turns this into a
/// [`DiffsimError::StabilityFailure`](crate::error::DiffsimError::StabilityFailure)
/// carrying the step number and the run parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divergence {
    pub position: usize,
    pub value: f64,
}

// =================================================================================================
// Transport Model Trait
// =================================================================================================

/// Trait for 1-D transport models
///
/// # Responsibility
///
/// Computes dC/dt at every **interior** grid point of a concentration profile.
/// Does NOT integrate it (that's the solver's job) and does NOT touch the two
/// boundary points, which the solver holds fixed.
///
/// # Thread Safety
///
/// Models are `Send + Sync`: a parameter sweep evaluates many models at once
/// and every one of them reads shared, immutable material tables.
pub trait TransportModel: Send + Sync {
    /// Number of spatial grid points the model expects
    fn points(&self) -> usize;

    /// Computes dC/dt for the interior points of `profile`
    ///
    /// # Arguments
    /// * `profile` - Current concentration profile, length [`points()`](Self::points)
    /// * `rate` - Output buffer of the same length; entries `0` and `points()-1`
    ///   are left untouched
    ///
    /// # Errors
    ///
    /// Returns the first point whose concentration (or a neighbour's) cannot
    /// be evaluated, typically because it is NaN or outside the tabulated
    /// concentration range.
    fn rate(&self, profile: &DVector<f64>, rate: &mut DVector<f64>) -> Result<(), Divergence>;

    /// Concentrations the model can evaluate
    ///
    /// The solver rejects any profile leaving this range as diverged.
    /// Unbounded by default.
    fn admissible(&self) -> RangeInclusive<f64> {
        f64::NEG_INFINITY..=f64::INFINITY
    }

    /// Name of the model (used for display and logging)
    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================
