//! Diffusion solver
//!
//! This module advances a 1-D concentration profile through time under
//! concentration-dependent diffusion and electromigration drift.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Transport model (equations)
//!    - Initial profile and the fixed end values taken from it
//!
//! 2. **Parameters** (`SimulationParameters`) - HOW to solve
//!    - Number of steps, time step, grid spacing
//!    - Drift coefficient and diffusivity multiplier
//!
//! 3. **Solver** (`DiffusionSolver` trait) - The numerical method
//!    - Applies the explicit scheme
//!    - Returns the final profile or a stability failure
//!
//! # Module Organization
//!
//! - **`traits`**: `SimulationParameters`, `DiffusionSolver`
//! - **`boundary`**: `FixedBoundaries` (Dirichlet ends)
//! - **`scenario`**: `Scenario` (model + initial profile)
//! - **`stability`**: `optimum_timestep`, `num_steps_for_duration`
//! - **`methods`**: `ForwardDifferenceSolver`
//!
//! # Quick Start Example
//!
//! ```rust
//! use diffsim_rs::solver::{optimum_timestep, num_steps_for_duration, simulate};
//! use nalgebra::DVector;
//!
//! let d = DVector::from_fn(101, |i, _| 1e-14 + 9e-14 * i as f64 / 100.0);
//! let r = d.clone();
//! let init = DVector::from_fn(40, |i, _| if i < 20 { 1.0 } else { 0.0 });
//!
//! let dx = 2.5e-7;
//! let dt = optimum_timestep(dx, d.max());
//! let ndt = num_steps_for_duration(dt, 60.0);
//!
//! let profile = simulate(&d, &r, &init, ndt, dt, dx, 0.0, 1.0).unwrap();
//! assert_eq!(profile.len(), 40);
//! ```
//!
//! # Error Handling
//!
//! Every entry point returns [`Result`](crate::error::Result). Common errors:
//! - Mismatched or empty D/R tables, empty profile
//! - Non-positive `dt`, `dx` or step count
//! - Numerical divergence, reported as
//!   [`DiffsimError::StabilityFailure`](crate::error::DiffsimError::StabilityFailure)
//!   with the offending step, position and parameters

// =================================================================================================
// Module Declarations
// =================================================================================================

mod boundary;
mod methods;
mod scenario;
mod stability;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use boundary::FixedBoundaries;
pub use methods::ForwardDifferenceSolver;
pub use scenario::Scenario;
pub use stability::{num_steps_for_duration, optimum_timestep, TIMESTEP_SAFETY_FACTOR};
pub use traits::{DiffusionSolver, SimulationParameters, MAX_TIMESTEPS};

use std::ops::RangeInclusive;

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};
use crate::physics::{Divergence, MaterialProperties};

// =================================================================================================
// Entry Point
// =================================================================================================

/// Runs one explicit simulation and returns the final profile
///
/// # Arguments
///
/// * `diffusivity`, `resistivity` - Tables over normalised concentration, same length
/// * `init` - Initial profile; its length sets the grid size
/// * `ndt` - Number of time steps
/// * `dt` - Time step [s]
/// * `dx` - Grid spacing [m]
/// * `drift` - Drift coefficient r, see [`emigration_factor`](crate::physics::emigration_factor)
/// * `cv_factor` - Multiplier applied to the diffusivity before the run
///
/// None of the inputs are modified.
///
/// # Errors
///
/// - [`DiffsimError::EmptyInput`] / [`DiffsimError::LengthMismatch`] for bad tables or profile
/// - [`DiffsimError::InvalidParameter`] for non-positive `ndt`, `dt`, `dx`
/// - [`DiffsimError::StabilityFailure`] when the profile diverges
#[allow(clippy::too_many_arguments)]
pub fn simulate(
    diffusivity: &DVector<f64>,
    resistivity: &DVector<f64>,
    init: &DVector<f64>,
    ndt: usize,
    dt: f64,
    dx: f64,
    drift: f64,
    cv_factor: f64,
) -> Result<DVector<f64>> {
    let material = MaterialProperties::new(diffusivity.clone(), resistivity.clone())?;
    let params = SimulationParameters::new(ndt, dt, dx)
        .with_drift(drift)
        .with_cv_factor(cv_factor);

    ForwardDifferenceSolver::new().simulate(&material, init, &params)
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Checks a profile for divergence
///
/// Returns the first point that is NaN, infinite, or outside `admissible`.
///
/// ```rust
/// use diffsim_rs::solver::validate_profile;
/// use nalgebra::DVector;
///
/// let ok = DVector::from_vec(vec![1.0, 0.4, 0.0]);
/// assert!(validate_profile(&ok, &(0.0..=1.0)).is_ok());
///
/// let bad = DVector::from_vec(vec![1.0, f64::NAN, 0.0]);
/// assert_eq!(validate_profile(&bad, &(0.0..=1.0)).unwrap_err().position, 1);
/// ```
pub fn validate_profile(
    profile: &DVector<f64>,
    admissible: &RangeInclusive<f64>,
) -> std::result::Result<(), Divergence> {
    match profile
        .iter()
        .position(|c| !c.is_finite() || !admissible.contains(c))
    {
        Some(position) => Err(Divergence {
            position,
            value: profile[position],
        }),
        None => Ok(()),
    }
}

/// Builds the stability diagnostic for a divergence at `step`
pub(crate) fn stability_failure(step: usize, divergence: Divergence, params: &SimulationParameters) -> DiffsimError {
    DiffsimError::StabilityFailure {
        step,
        position: divergence.position,
        value: divergence.value,
        dt: params.dt,
        dx: params.dx,
        drift: params.drift,
        cv_factor: params.cv_factor,
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_table(n: usize) -> DVector<f64> {
        DVector::from_fn(n, |i, _| 1e-14 + 9e-14 * i as f64 / (n - 1) as f64)
    }

    #[test]
    fn test_simulate_rejects_mismatched_tables() {
        let init = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        let err = simulate(&linear_table(5), &linear_table(4), &init, 10, 0.01, 1e-7, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            DiffsimError::LengthMismatch { expected: 5, actual: 4, .. }
        ));
    }

    #[test]
    fn test_simulate_rejects_empty_inputs() {
        let empty = DVector::<f64>::zeros(0);
        let init = DVector::from_vec(vec![1.0, 0.0]);
        assert!(matches!(
            simulate(&empty, &empty, &init, 10, 0.01, 1e-7, 0.0, 1.0),
            Err(DiffsimError::EmptyInput(_))
        ));
        assert!(matches!(
            simulate(&linear_table(5), &linear_table(5), &empty, 10, 0.01, 1e-7, 0.0, 1.0),
            Err(DiffsimError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_simulate_rejects_zero_steps() {
        let init = DVector::from_vec(vec![1.0, 0.0, 0.0]);
        assert!(matches!(
            simulate(&linear_table(5), &linear_table(5), &init, 0, 0.01, 1e-7, 0.0, 1.0),
            Err(DiffsimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_stability_failure_carries_parameters() {
        let params = SimulationParameters::new(5, 0.2, 1e-7).with_drift(-4.0).with_cv_factor(2.0);
        let err = stability_failure(3, Divergence { position: 7, value: 1.9 }, &params);
        match err {
            DiffsimError::StabilityFailure { step, position, value, dt, dx, drift, cv_factor } => {
                assert_eq!((step, position), (3, 7));
                assert_eq!(value, 1.9);
                assert_eq!((dt, dx, drift, cv_factor), (0.2, 1e-7, -4.0, 2.0));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_validate_profile_flags_out_of_range() {
        let profile = DVector::from_vec(vec![1.0, 0.5, -0.2]);
        let d = validate_profile(&profile, &(0.0..=1.0)).unwrap_err();
        assert_eq!(d.position, 2);
        assert_eq!(d.value, -0.2);
        assert!(validate_profile(&profile, &(f64::NEG_INFINITY..=f64::INFINITY)).is_ok());
    }
}
