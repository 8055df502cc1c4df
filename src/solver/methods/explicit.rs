//! Explicit forward-difference solver
//!
//! # Mathematical Background
//!
//! The transport model turns the PDE into a system of ODEs, one per grid
//! point (method of lines). This solver marches that system with the forward
//! Euler update:
//!
//! ```text
//! C_{n+1} = C_n + dt · f(C_n)
//! ```
//!
//! followed by re-imposing the fixed end values.
//!
//! # Characteristics
//!
//! - **Order**: First-order in time, O(dt)
//! - **Stability**: Conditional, see [`optimum_timestep`](crate::solver::optimum_timestep)
//! - **Cost**: 1 model evaluation per step
//! - **Memory**: Two profile-sized buffers, reused for every step
//!
//! # Divergence
//!
//! After every step the profile is checked against the range the model can
//! evaluate. The first violation aborts the run with
//! [`DiffsimError::StabilityFailure`](crate::error::DiffsimError::StabilityFailure);
//! a diverged profile is never returned.
//!
//! # Example
//!
//! ```rust
//! use diffsim_rs::physics::MaterialProperties;
//! use diffsim_rs::solver::{DiffusionSolver, ForwardDifferenceSolver, SimulationParameters};
//! use nalgebra::DVector;
//!
//! let material = MaterialProperties::from_slices(&[1e-13; 3], &[1.0; 3]).unwrap();
//! let initial = DVector::from_fn(20, |i, _| if i < 10 { 1.0 } else { 0.0 });
//! let params = SimulationParameters::for_duration(1.0, 1e-7, 1e-13, 1.0).unwrap();
//!
//! let solver = ForwardDifferenceSolver::new();
//! let result = solver.simulate(&material, &initial, &params).unwrap();
//!
//! assert_eq!(result.len(), 20);
//! assert_eq!(result[0], 1.0);
//! assert_eq!(result[19], 0.0);
//! ```

use log::debug;
use nalgebra::DVector;

use crate::error::{DiffsimError, Result};
use crate::models::ElectromigrationModel;
use crate::physics::MaterialProperties;
use crate::solver;
use crate::solver::{DiffusionSolver, Scenario, SimulationParameters};

// =================================================================================================
// Forward Difference Solver
// =================================================================================================

/// Forward-time finite-difference solver
///
/// # Algorithm
///
/// 1. Start from the scenario's initial profile
/// 2. For each step n = 0, 1, ..., N-1:
///    - Compute the rate: k = f(C_n) (interior points only)
///    - Update: C_{n+1} = C_n + dt · k
///    - Re-impose the fixed end values
///    - Check the profile against the model's admissible range
/// 3. Return the final profile
///
/// The solver is stateless and can be shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardDifferenceSolver;

impl ForwardDifferenceSolver {
    /// Create a new forward-difference solver
    ///
    /// ```rust
    /// use diffsim_rs::solver::{DiffusionSolver, ForwardDifferenceSolver};
    ///
    /// let solver = ForwardDifferenceSolver::new();
    /// assert_eq!(solver.name(), "Forward Difference");
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Marches a scenario for `params.num_timesteps` steps of `params.dt`
    ///
    /// Works for any [`TransportModel`](crate::physics::TransportModel). Only
    /// `num_timesteps` and `dt` are read from `params` for the time march; the
    /// remaining fields are reported in diagnostics.
    pub fn integrate(&self, scenario: &Scenario, params: &SimulationParameters) -> Result<DVector<f64>> {
        // ====== Step 1: Validation ======

        params.validate()?;

        let model = scenario.model.as_ref();
        let admissible = model.admissible();

        let mut state = scenario.initial.clone();
        solver::validate_profile(&state, &admissible)
            .map_err(|d| solver::stability_failure(0, d, params))?;

        // ====== Step 2: Setup ======

        // Boundary entries of the rate stay zero for the whole run
        let mut rate = DVector::zeros(state.len());

        debug!(
            "{}: {} points, {} steps of {} s (r = {}, cv = {})",
            model.name(),
            state.len(),
            params.num_timesteps,
            params.dt,
            params.drift,
            params.cv_factor
        );

        // ====== Step 3: Time Integration ======

        for step in 0..params.num_timesteps {
            model
                .rate(&state, &mut rate)
                .map_err(|d| solver::stability_failure(step, d, params))?;

            // C_{n+1} = C_n + dt · f(C_n)
            state.axpy(params.dt, &rate, 1.0);
            scenario.boundaries.apply(&mut state);

            solver::validate_profile(&state, &admissible)
                .map_err(|d| solver::stability_failure(step + 1, d, params))?;
        }

        Ok(state)
    }
}

impl DiffusionSolver for ForwardDifferenceSolver {
    fn simulate(
        &self,
        material: &MaterialProperties,
        initial: &DVector<f64>,
        params: &SimulationParameters,
    ) -> Result<DVector<f64>> {
        if initial.is_empty() {
            return Err(DiffsimError::EmptyInput("initial profile"));
        }
        params.validate()?;

        // Cv/Cve scales D once, before the loop
        let scaled = material.with_diffusivity_factor(params.cv_factor);
        let model = ElectromigrationModel::new(scaled, initial.len(), params.dx, params.drift)?;
        let scenario = Scenario::new(Box::new(model), initial.clone())?;

        self.integrate(&scenario, params)
    }

    fn name(&self) -> &str {
        "Forward Difference"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Divergence, TransportModel};
    use approx::assert_relative_eq;

    // ====== Mock Models for Testing ======

    /// Interior decay dC/dt = -k·C
    ///
    /// Analytical solution at interior points: C(t) = C_0·exp(-k·t)
    struct ExponentialDecay {
        points: usize,
        k: f64,
    }

    impl TransportModel for ExponentialDecay {
        fn points(&self) -> usize {
            self.points
        }

        fn rate(&self, profile: &DVector<f64>, rate: &mut DVector<f64>) -> std::result::Result<(), Divergence> {
            for i in 1..self.points - 1 {
                rate[i] = -self.k * profile[i];
            }
            Ok(())
        }

        fn name(&self) -> &str {
            "Exponential Decay"
        }
    }

    /// Interior growth dC/dt = +g, bounded to [0, 1]
    struct BoundedGrowth {
        points: usize,
        g: f64,
    }

    impl TransportModel for BoundedGrowth {
        fn points(&self) -> usize {
            self.points
        }

        fn rate(&self, _profile: &DVector<f64>, rate: &mut DVector<f64>) -> std::result::Result<(), Divergence> {
            for i in 1..self.points - 1 {
                rate[i] = self.g;
            }
            Ok(())
        }

        fn admissible(&self) -> std::ops::RangeInclusive<f64> {
            0.0..=1.0
        }

        fn name(&self) -> &str {
            "Bounded Growth"
        }
    }

    fn decay_scenario(k: f64) -> Scenario {
        let model = Box::new(ExponentialDecay { points: 5, k });
        Scenario::new(model, DVector::from_element(5, 1.0)).unwrap()
    }

    // ====== Solver Creation Tests ======

    #[test]
    fn test_solver_name() {
        assert_eq!(ForwardDifferenceSolver::new().name(), "Forward Difference");
        assert_eq!(ForwardDifferenceSolver::default().name(), "Forward Difference");
    }

    // ====== Integration Tests ======

    #[test]
    fn test_exponential_decay_converges() {
        let scenario = decay_scenario(0.5);
        let params = SimulationParameters::new(10_000, 1e-4, 1.0);

        let result = ForwardDifferenceSolver.integrate(&scenario, &params).unwrap();

        // Interior follows exp(-k t), ends stay fixed
        assert_relative_eq!(result[2], (-0.5f64).exp(), max_relative = 1e-3);
        assert_eq!(result[0], 1.0);
        assert_eq!(result[4], 1.0);
    }

    #[test]
    fn test_single_step_is_exact_euler_update() {
        let scenario = decay_scenario(2.0);
        let params = SimulationParameters::new(1, 0.1, 1.0);

        let result = ForwardDifferenceSolver.integrate(&scenario, &params).unwrap();

        assert_relative_eq!(result[1], 1.0 - 0.1 * 2.0);
    }

    #[test]
    fn test_leaving_admissible_range_is_stability_failure() {
        let model = Box::new(BoundedGrowth { points: 3, g: 1.0 });
        let scenario = Scenario::new(model, DVector::from_vec(vec![0.0, 0.0, 0.0])).unwrap();
        // Middle point passes 1.0 on step 11
        let params = SimulationParameters::new(100, 0.1, 1.0);

        let err = ForwardDifferenceSolver.integrate(&scenario, &params).unwrap_err();
        match err {
            DiffsimError::StabilityFailure { step, position, dt, .. } => {
                assert_eq!(position, 1);
                assert!((10..=11).contains(&step));
                assert_eq!(dt, 0.1);
            }
            other => panic!("expected stability failure, got {other}"),
        }
    }

    #[test]
    fn test_invalid_parameters_rejected_before_work() {
        let scenario = decay_scenario(1.0);
        let params = SimulationParameters::new(0, 0.1, 1.0);
        assert!(matches!(
            ForwardDifferenceSolver.integrate(&scenario, &params),
            Err(DiffsimError::InvalidParameter(_))
        ));
    }

    // ====== Electromigration Runs ======

    #[test]
    fn test_simulate_rejects_empty_profile() {
        let material = MaterialProperties::from_slices(&[1e-13], &[1.0]).unwrap();
        let params = SimulationParameters::new(1, 0.01, 1e-7);
        let err = ForwardDifferenceSolver
            .simulate(&material, &DVector::zeros(0), &params)
            .unwrap_err();
        assert!(matches!(err, DiffsimError::EmptyInput(_)));
    }

    #[test]
    fn test_simulate_leaves_inputs_untouched() {
        let material = MaterialProperties::from_slices(&[1e-14, 1e-13], &[1.0, 2.0]).unwrap();
        let before = material.clone();
        let initial = DVector::from_fn(10, |i, _| if i < 5 { 1.0 } else { 0.0 });
        let params = SimulationParameters::new(50, 0.001, 1e-7).with_cv_factor(3.0);

        let result = ForwardDifferenceSolver.simulate(&material, &initial, &params).unwrap();

        assert_eq!(material, before);
        assert_eq!(initial[4], 1.0);
        assert_eq!(initial[5], 0.0);
        assert_ne!(result, initial);
    }

    #[test]
    fn test_out_of_range_initial_profile_fails_at_step_zero() {
        let material = MaterialProperties::from_slices(&[1e-13; 11], &[1.0; 11]).unwrap();
        let initial = DVector::from_vec(vec![1.0, 3.0, 0.0]);
        let params = SimulationParameters::new(10, 0.01, 1e-7);

        let err = ForwardDifferenceSolver.simulate(&material, &initial, &params).unwrap_err();
        assert!(matches!(
            err,
            DiffsimError::StabilityFailure { step: 0, position: 1, .. }
        ));
    }
}
