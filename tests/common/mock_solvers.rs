//! Mock solvers for testing the parameter search
//!
//! Their output is known in closed form, so sweep results can be checked
//! cell by cell without running the explicit scheme.

use std::sync::atomic::{AtomicUsize, Ordering};

use diffsim_rs::error::{DiffsimError, Result};
use diffsim_rs::physics::MaterialProperties;
use diffsim_rs::solver::{DiffusionSolver, SimulationParameters};
use nalgebra::DVector;

// =================================================================================================
// Scaled profile: C = cv_factor · C₀
// =================================================================================================

/// Returns the initial profile scaled by `cv_factor`
///
/// Diverges for every cv_factor listed in `unstable_cv` and for every run
/// whose drift magnitude exceeds `max_drift`.
pub struct ScaledProfileSolver {
    pub unstable_cv: Vec<f64>,
    pub max_drift: f64,
}

impl ScaledProfileSolver {
    pub fn stable() -> Self {
        Self {
            unstable_cv: Vec::new(),
            max_drift: f64::INFINITY,
        }
    }

    fn diverges(&self, params: &SimulationParameters) -> bool {
        self.unstable_cv.contains(&params.cv_factor) || params.drift.abs() > self.max_drift
    }
}

impl DiffusionSolver for ScaledProfileSolver {
    fn simulate(
        &self,
        _material: &MaterialProperties,
        initial: &DVector<f64>,
        params: &SimulationParameters,
    ) -> Result<DVector<f64>> {
        if self.diverges(params) {
            return Err(DiffsimError::StabilityFailure {
                step: params.num_timesteps,
                position: 0,
                value: f64::INFINITY,
                dt: params.dt,
                dx: params.dx,
                drift: params.drift,
                cv_factor: params.cv_factor,
            });
        }
        Ok(initial * params.cv_factor)
    }

    fn name(&self) -> &str {
        "Scaled Profile"
    }
}

// =================================================================================================
// Counting wrapper
// =================================================================================================

/// Wraps a solver and counts its invocations across threads
pub struct CountingSolver<S> {
    pub inner: S,
    pub calls: AtomicUsize,
}

impl<S> CountingSolver<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: DiffusionSolver> DiffusionSolver for CountingSolver<S> {
    fn simulate(
        &self,
        material: &MaterialProperties,
        initial: &DVector<f64>,
        params: &SimulationParameters,
    ) -> Result<DVector<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.simulate(material, initial, params)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
