//! Time-step selection for the explicit scheme
//!
//! The explicit forward-difference update is only conditionally stable. For
//! pure diffusion the classical bound is `dt ≤ dx² / (2·D_max)`; the drift
//! term tightens it further. We keep a fixed safety margin well under that
//! bound rather than deriving a per-run CFL number.

/// Fraction of `dx² / D_max` used as the time step
pub const TIMESTEP_SAFETY_FACTOR: f64 = 0.1;

/// Heuristic stable time step for the explicit scheme
///
/// ```text
/// dt = 0.1 · dx² / D_max
/// ```
///
/// `max_diffusivity` must already include any Cv/Cve scaling. A zero or
/// negative diffusivity gives a non-finite or negative step, which
/// [`SimulationParameters::validate`](crate::solver::SimulationParameters::validate)
/// rejects.
///
/// # Example
///
/// ```rust
/// use diffsim_rs::solver::optimum_timestep;
///
/// let dt = optimum_timestep(2.5e-7, 1e-13);
/// assert!((dt - 0.0625).abs() < 1e-12);
/// ```
#[inline]
pub fn optimum_timestep(dx: f64, max_diffusivity: f64) -> f64 {
    TIMESTEP_SAFETY_FACTOR * dx * dx / max_diffusivity
}

/// Number of steps of size `dt` needed to cover `total_time`
///
/// Rounds up, so the simulated time is never shorter than requested.
///
/// ```rust
/// use diffsim_rs::solver::num_steps_for_duration;
///
/// assert_eq!(num_steps_for_duration(0.05, 7200.0), 144_000);
/// assert_eq!(num_steps_for_duration(0.3, 1.0), 4);
/// ```
#[inline]
pub fn num_steps_for_duration(dt: f64, total_time: f64) -> usize {
    (total_time / dt).ceil() as usize
}
