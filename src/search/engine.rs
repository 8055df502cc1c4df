//! Concurrent (z*, Cv/Cve) parameter search
//!
//! # Workflow
//!
//! ```text
//! ParameterGrid (z* × Cv/Cve)
//!        │  one work unit per cell, fixed-size rayon pool
//!        ▼
//! for each experimental condition (current, direction):
//!     r = drift_coefficient(z*, current, direction, T)
//!     profile = solver.simulate(D, R, init, params(r, Cv/Cve))
//!     error += calibrate(profile, experiment).least_squares
//!        │
//!        ▼
//! ErrorSurface[(z index, Cv index)] = error
//! ```
//!
//! # Concurrency
//!
//! - Every work unit owns exactly one cell of the surface storage, so the
//!   writes are disjoint and need no locking.
//! - Material tables, the initial profile and the experiments are shared
//!   read-only by all workers.
//! - The progress callback is serialised through a mutex: it sees the
//!   completed count 1, 2, ..., N in order, from whichever worker finished.
//!
//! # Failure Isolation
//!
//! A cell whose simulation diverges is flagged unstable, logged and counted;
//! the sweep carries on. Grid values that give invalid run parameters are
//! rejected before any cell runs; any other cell error is returned once the
//! sweep has drained.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::comparison::{calibrate, Calibration};
use crate::defaults::{default_dx, DEFAULT_DURATION, DEFAULT_TIMESTEP, DEFAULT_WORKERS};
use crate::error::{DiffsimError, Result};
use crate::physics::{drift_coefficient, Direction, MaterialProperties};
use crate::search::grid::ParameterGrid;
use crate::search::surface::ErrorSurface;
use crate::solver::{num_steps_for_duration, DiffusionSolver, ForwardDifferenceSolver, SimulationParameters};

// =================================================================================================
// Inputs
// =================================================================================================

/// One experimental curve and the conditions it was measured under
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Current density magnitude [A/cm²]
    pub current_density: f64,

    /// Direction the current was applied in
    pub direction: Direction,

    /// Measured profile, sampled on the simulation grid
    pub experiment: DVector<f64>,
}

impl Condition {
    pub fn new(current_density: f64, direction: Direction, experiment: DVector<f64>) -> Self {
        Self {
            current_density,
            direction,
            experiment,
        }
    }
}

/// Read-only data shared by every cell of a sweep
///
/// Built once per search. The material tables are expected to be sampled
/// for `temperature`.
#[derive(Debug, Clone)]
pub struct SearchContext {
    material: MaterialProperties,
    initial: DVector<f64>,
    temperature: f64,
    conditions: Vec<Condition>,
}

impl SearchContext {
    /// Creates a context without experimental conditions
    pub fn new(material: MaterialProperties, initial: DVector<f64>, temperature: f64) -> Result<Self> {
        if initial.is_empty() {
            return Err(DiffsimError::EmptyInput("initial profile"));
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "temperature must be positive and finite, got {temperature} K"
            )));
        }
        Ok(Self {
            material,
            initial,
            temperature,
            conditions: Vec::new(),
        })
    }

    /// Adds an experimental condition; its profile must match the grid
    pub fn with_condition(mut self, condition: Condition) -> Result<Self> {
        if condition.experiment.len() != self.initial.len() {
            return Err(DiffsimError::length_mismatch(
                "experiment/initial profile",
                self.initial.len(),
                condition.experiment.len(),
            ));
        }
        self.conditions.push(condition);
        Ok(self)
    }

    /// Adds several conditions
    pub fn with_conditions(self, conditions: impl IntoIterator<Item = Condition>) -> Result<Self> {
        conditions
            .into_iter()
            .try_fold(self, |context, condition| context.with_condition(condition))
    }

    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    pub fn initial(&self) -> &DVector<f64> {
        &self.initial
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// Sweep settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Size of the worker pool
    pub workers: usize,

    /// Time stepping and grid spacing shared by every cell; `drift` and
    /// `cv_factor` are overwritten per cell
    pub timing: SimulationParameters,
}

impl Default for SearchConfig {
    /// 8 workers, 2 hours in 0.05 s steps on a 25 µm / 100 grid
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timing: SimulationParameters::new(
                num_steps_for_duration(DEFAULT_TIMESTEP, DEFAULT_DURATION),
                DEFAULT_TIMESTEP,
                default_dx(),
            ),
        }
    }
}

impl SearchConfig {
    /// Builder: sets the pool size
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder: sets the time stepping
    pub fn with_timing(mut self, timing: SimulationParameters) -> Self {
        self.timing = timing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DiffsimError::InvalidParameter(
                "a search needs at least one worker".to_string(),
            ));
        }
        self.timing.validate()
    }
}

// =================================================================================================
// Outputs
// =================================================================================================

/// Result of a sweep
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub surface: ErrorSurface,

    /// Wall-clock time of the sweep
    pub elapsed: Duration,
}

impl SearchReport {
    pub fn unstable_count(&self) -> usize {
        self.surface.unstable_count()
    }
}

/// A single simulation compared against one experiment
#[derive(Debug, Clone, PartialEq)]
pub struct SingleComparison {
    /// Simulated profile as returned by the solver
    pub simulated: DVector<f64>,

    /// Simulated profile moved by the calibrated shift
    pub aligned: DVector<f64>,

    pub calibration: Calibration,

    /// Least-squares error of the aligned profile
    pub shifted_error: f64,
}

// =================================================================================================
// Parameter Search
// =================================================================================================

/// Sweep engine, generic over the diffusion solver
///
/// # Example
///
/// ```rust,no_run
/// use diffsim_rs::physics::{Direction, MaterialProperties};
/// use diffsim_rs::search::{Condition, ParameterSearch, SearchConfig, SearchContext};
/// use nalgebra::DVector;
///
/// # fn main() -> diffsim_rs::error::Result<()> {
/// let material = MaterialProperties::from_slices(&[1e-14, 1e-13], &[1.0, 2.0])?;
/// let initial = DVector::from_fn(100, |i, _| if i < 50 { 1.0 } else { 0.0 });
/// let measured = initial.clone();
///
/// let context = SearchContext::new(material, initial, 973.0)?
///     .with_condition(Condition::new(1000.0, Direction::Forward, measured))?;
///
/// let search = ParameterSearch::new(SearchConfig::default());
/// let report = search.search(&[100.0, 200.0], &[1.0, 2.0], &context, |done| {
///     println!("{done} cells done");
/// })?;
///
/// println!("best cell: {:?}", report.surface.argmin());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ParameterSearch<S = ForwardDifferenceSolver> {
    solver: S,
    config: SearchConfig,
}

impl ParameterSearch<ForwardDifferenceSolver> {
    /// Sweep with the explicit forward-difference solver
    pub fn new(config: SearchConfig) -> Self {
        Self::with_solver(ForwardDifferenceSolver::new(), config)
    }
}

impl<S: DiffusionSolver> ParameterSearch<S> {
    pub fn with_solver(solver: S, config: SearchConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Run parameters for one (z*, Cv/Cve, condition) combination
    fn run_parameters(&self, z: f64, cv_factor: f64, condition: &Condition, temperature: f64) -> SimulationParameters {
        let drift = drift_coefficient(z, condition.current_density, condition.direction, temperature);
        self.config.timing.with_drift(drift).with_cv_factor(cv_factor)
    }

    /// Rejects grid values no cell could run with
    ///
    /// Every (z*, Cv/Cve, condition) combination must give valid run
    /// parameters; checked up front so a bad range fails before any cell runs.
    fn validate_grid(&self, grid: &ParameterGrid, context: &SearchContext) -> Result<()> {
        for &z in grid.rows() {
            for &cv_factor in grid.cols() {
                for condition in context.conditions() {
                    self.run_parameters(z, cv_factor, condition, context.temperature())
                        .validate()?;
                }
            }
        }
        Ok(())
    }

    /// Summed unshifted least-squares error of one cell over all conditions
    pub fn evaluate_cell(&self, z: f64, cv_factor: f64, context: &SearchContext) -> Result<f64> {
        let mut total = 0.0;
        for condition in context.conditions() {
            let params = self.run_parameters(z, cv_factor, condition, context.temperature());
            let profile = self.solver.simulate(context.material(), context.initial(), &params)?;
            total += calibrate(&profile, &condition.experiment)?.least_squares;
        }
        Ok(total)
    }

    /// Simulates one combination and aligns it with one experiment
    ///
    /// Unlike a sweep, divergence here is a hard error.
    pub fn single_comparison(
        &self,
        z: f64,
        cv_factor: f64,
        condition: &Condition,
        context: &SearchContext,
    ) -> Result<SingleComparison> {
        let params = self.run_parameters(z, cv_factor, condition, context.temperature());
        let simulated = self.solver.simulate(context.material(), context.initial(), &params)?;
        let calibration = calibrate(&simulated, &condition.experiment)?;
        let aligned = calibration.apply(&simulated)?;
        let shifted_error = crate::comparison::least_squares(&aligned, &condition.experiment)?;

        Ok(SingleComparison {
            simulated,
            aligned,
            calibration,
            shifted_error,
        })
    }

    /// Evaluates every (z*, Cv/Cve) combination on the worker pool
    ///
    /// Rows of the returned surface follow `z_values`, columns follow
    /// `cv_values`. `progress` is called once per finished cell with the
    /// number of cells finished so far.
    ///
    /// # Errors
    ///
    /// - Empty ranges or a context without conditions
    /// - Invalid configuration, or a Cv/Cve or z* value giving invalid run
    ///   parameters; no cell runs in either case
    /// - A pool that cannot be started
    /// - The first non-stability error raised by any cell
    pub fn search<F>(
        &self,
        z_values: &[f64],
        cv_values: &[f64],
        context: &SearchContext,
        progress: F,
    ) -> Result<SearchReport>
    where
        F: Fn(usize) + Sync,
    {
        // ====== Step 1: Validation ======

        self.config.validate()?;
        let grid = ParameterGrid::new(z_values.to_vec(), cv_values.to_vec())?;
        if context.conditions().is_empty() {
            return Err(DiffsimError::EmptyInput("experimental conditions"));
        }
        self.validate_grid(&grid, context)?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()
            .map_err(|e| DiffsimError::ThreadPool(e.to_string()))?;

        // ====== Step 2: Storage ======

        let (nrows, ncols) = grid.shape();
        let mut values = DMatrix::<f64>::zeros(nrows, ncols);
        let mut unstable = vec![false; grid.len()];

        let completed = Mutex::new(0usize);
        let failure: Mutex<Option<DiffsimError>> = Mutex::new(None);

        info!(
            "Searching {} x {} cells over {} condition(s) with {} workers ({})",
            nrows,
            ncols,
            context.conditions().len(),
            self.config.workers,
            self.solver.name()
        );
        let start = Instant::now();

        // ====== Step 3: Sweep ======

        // DMatrix storage is column-major, matching ParameterGrid::cell
        pool.install(|| {
            values
                .as_mut_slice()
                .par_iter_mut()
                .zip(unstable.par_iter_mut())
                .enumerate()
                .for_each(|(k, (value, flag))| {
                    let Some(cell) = grid.cell(k) else {
                        return;
                    };
                    debug!("Executing workload ({}, {})", cell.a, cell.b);

                    match self.evaluate_cell(cell.a, cell.b, context) {
                        Ok(error) => {
                            debug!(
                                "Writing ({}, {}) (val = {}) into position ({}, {})",
                                cell.a, cell.b, error, cell.row, cell.col
                            );
                            *value = error;
                        }
                        Err(err) if err.is_stability_failure() => {
                            warn!(
                                "Simulation unstable for ({}, {}) at position ({}, {}): {}",
                                cell.a, cell.b, cell.row, cell.col, err
                            );
                            *flag = true;
                        }
                        Err(err) => {
                            let mut slot = failure.lock().unwrap_or_else(PoisonError::into_inner);
                            slot.get_or_insert(err);
                        }
                    }

                    let mut done = completed.lock().unwrap_or_else(PoisonError::into_inner);
                    *done += 1;
                    progress(*done);
                });
        });

        let elapsed = start.elapsed();

        // ====== Step 4: Assemble ======

        if let Some(err) = failure.into_inner().unwrap_or_else(PoisonError::into_inner) {
            return Err(err);
        }

        let unstable_cells: Vec<(usize, usize)> = unstable
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(|(k, _)| (k % nrows, k / nrows))
            .collect();

        info!(
            "Search finished in {:.2?}, simulation unstable count: {}",
            elapsed,
            unstable_cells.len()
        );

        let surface = ErrorSurface::new(grid.rows().to_vec(), grid.cols().to_vec(), values, unstable_cells)?;
        Ok(SearchReport { surface, elapsed })
    }
}

/// Simulates and aligns a single (z*, Cv/Cve) combination with the explicit solver
///
/// Convenience for one-off comparisons and plots; divergence is returned as
/// [`DiffsimError::StabilityFailure`].
pub fn run_single_comparison(
    z: f64,
    cv_factor: f64,
    condition: &Condition,
    context: &SearchContext,
    timing: SimulationParameters,
) -> Result<SingleComparison> {
    let config = SearchConfig::default().with_workers(1).with_timing(timing);
    ParameterSearch::new(config).single_comparison(z, cv_factor, condition, context)
}

// =================================================================================================
// Tests
// =================================================================================================
