//! Solver configuration and the solver trait
//!
//! # Design
//!
//! - `SimulationParameters` is the value object describing one run: how many
//!   steps, how large they are, the grid spacing, the drift coefficient and
//!   the diffusivity multiplier. Factory methods cover the usual ways of
//!   building one and `validate()` checks it before any work starts.
//! - `DiffusionSolver` is the seam the parameter search is generic over, so a
//!   sweep can run the explicit solver or any other implementation.

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};
use crate::physics::MaterialProperties;
use crate::solver::stability::{num_steps_for_duration, optimum_timestep};

/// Upper bound on the number of time steps of a single run
///
/// Guarantees termination of every simulation, including sweep cells whose
/// parameters would otherwise ask for an unreasonable number of steps.
pub const MAX_TIMESTEPS: usize = 1_000_000_000;

// =================================================================================================
// Simulation Parameters
// =================================================================================================

/// Scalar parameters of one simulation run
///
/// The spatial grid size is not stored here: it is the length of the
/// initial profile handed to the solver.
///
/// # Examples
///
/// ```rust
/// use diffsim_rs::solver::SimulationParameters;
///
/// // 2 hours at dt = 0.05 s on a 25 µm / 100 grid, with drift
/// let params = SimulationParameters::new(144_000, 0.05, 2.5e-7)
///     .with_drift(-1.9e3)
///     .with_cv_factor(2.0);
///
/// assert!(params.validate().is_ok());
/// assert_eq!(params.total_time(), 7200.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
    /// Number of explicit time steps
    pub num_timesteps: usize,

    /// Time step [s]
    pub dt: f64,

    /// Grid spacing [m]
    pub dx: f64,

    /// Drift coefficient r (sign encodes current direction)
    pub drift: f64,

    /// Multiplier applied to the diffusivity table before the run (Cv/Cve)
    pub cv_factor: f64,
}

impl SimulationParameters {
    /// Pure diffusion run: no drift, unscaled diffusivity
    pub fn new(num_timesteps: usize, dt: f64, dx: f64) -> Self {
        Self {
            num_timesteps,
            dt,
            dx,
            drift: 0.0,
            cv_factor: 1.0,
        }
    }

    /// Run lasting `total_time` seconds with the heuristic stable time step
    ///
    /// `max_diffusivity` is the largest value of the **unscaled** table; the
    /// time step accounts for `cv_factor` itself.
    pub fn for_duration(total_time: f64, dx: f64, max_diffusivity: f64, cv_factor: f64) -> Result<Self> {
        let dt = optimum_timestep(dx, max_diffusivity * cv_factor);
        if !(dt.is_finite() && dt > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "no stable time step for dx = {dx} and max diffusivity = {}",
                max_diffusivity * cv_factor
            )));
        }
        if !(total_time.is_finite() && total_time > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "duration must be positive and finite, got {total_time}"
            )));
        }

        let params = Self::new(num_steps_for_duration(dt, total_time), dt, dx).with_cv_factor(cv_factor);
        params.validate()?;
        Ok(params)
    }

    /// Builder: sets the drift coefficient
    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    /// Builder: sets the diffusivity multiplier
    pub fn with_cv_factor(mut self, cv_factor: f64) -> Self {
        self.cv_factor = cv_factor;
        self
    }

    /// Simulated time covered by the run [s]
    pub fn total_time(&self) -> f64 {
        self.num_timesteps as f64 * self.dt
    }

    /// Checks that the parameters describe a run that can be executed
    ///
    /// - `0 < num_timesteps ≤ MAX_TIMESTEPS`
    /// - `dt`, `dx` positive and finite
    /// - `drift` finite
    /// - `cv_factor` positive and finite
    pub fn validate(&self) -> Result<()> {
        if self.num_timesteps == 0 {
            return Err(DiffsimError::InvalidParameter(
                "number of time steps must be greater than 0".to_string(),
            ));
        }
        if self.num_timesteps > MAX_TIMESTEPS {
            return Err(DiffsimError::InvalidParameter(format!(
                "number of time steps {} exceeds the limit of {}",
                self.num_timesteps, MAX_TIMESTEPS
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(self.dx.is_finite() && self.dx > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "dx must be positive and finite, got {}",
                self.dx
            )));
        }
        if !self.drift.is_finite() {
            return Err(DiffsimError::InvalidParameter(format!(
                "drift coefficient must be finite, got {}",
                self.drift
            )));
        }
        if !(self.cv_factor.is_finite() && self.cv_factor > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "cv_factor must be positive and finite, got {}",
                self.cv_factor
            )));
        }
        Ok(())
    }
}

// =================================================================================================
// Solver Trait
// =================================================================================================

/// A method that advances a concentration profile through time
///
/// # Contract
///
/// - Never mutates `material` or `initial`
/// - Returns a profile of the same length as `initial`
/// - Reports divergence as
///   [`DiffsimError::StabilityFailure`](crate::error::DiffsimError::StabilityFailure),
///   never as a NaN-laden profile
///
/// Implementations are `Send + Sync` so one instance can serve every worker
/// of a parameter sweep.
pub trait DiffusionSolver: Send + Sync {
    /// Runs one simulation and returns the final profile
    fn simulate(
        &self,
        material: &MaterialProperties,
        initial: &DVector<f64>,
        params: &SimulationParameters,
    ) -> Result<DVector<f64>>;

    /// Name of the method (used for display and logging)
    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_defaults_to_pure_diffusion() {
        let p = SimulationParameters::new(10, 0.1, 1e-7);
        assert_eq!(p.drift, 0.0);
        assert_eq!(p.cv_factor, 1.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_each_bad_field() {
        let ok = SimulationParameters::new(10, 0.1, 1e-7);
        let bad = [
            SimulationParameters { num_timesteps: 0, ..ok },
            SimulationParameters { num_timesteps: MAX_TIMESTEPS + 1, ..ok },
            SimulationParameters { dt: 0.0, ..ok },
            SimulationParameters { dt: f64::INFINITY, ..ok },
            SimulationParameters { dx: -1e-7, ..ok },
            SimulationParameters { drift: f64::NAN, ..ok },
            SimulationParameters { cv_factor: 0.0, ..ok },
        ];
        for p in bad {
            assert!(
                matches!(p.validate(), Err(DiffsimError::InvalidParameter(_))),
                "{:?} should be rejected",
                p
            );
        }
    }

    #[test]
    fn test_for_duration_uses_scaled_diffusivity() {
        let p = SimulationParameters::for_duration(7200.0, 2.5e-7, 1e-13, 2.0).unwrap();
        assert_relative_eq!(p.dt, 0.03125, max_relative = 1e-12);
        assert_eq!(p.num_timesteps, num_steps_for_duration(p.dt, 7200.0));
        assert!((230_400..=230_401).contains(&p.num_timesteps));
        assert_eq!(p.cv_factor, 2.0);
        assert!(p.total_time() >= 7200.0);
    }

    #[test]
    fn test_for_duration_rejects_zero_diffusivity() {
        assert!(SimulationParameters::for_duration(10.0, 1e-7, 0.0, 1.0).is_err());
        assert!(SimulationParameters::for_duration(-1.0, 1e-7, 1e-13, 1.0).is_err());
    }
}
