//! Default sweep settings
//!
//! These reproduce the setup the fitted datasets were produced with: a
//! 25 µm domain on 100 points, properties resampled to 10001 concentration
//! samples, 2 hours of annealing at 973 K in 0.05 s steps, 8 workers.

use nalgebra::DVector;

/// Concentration samples in resampled D/R tables
pub const DEFAULT_PROPERTY_SAMPLES: usize = 10001;

/// Spatial grid points
pub const DEFAULT_GRID_POINTS: usize = 100;

/// Length of the simulated domain [µm]
pub const DEFAULT_DOMAIN_MICRONS: f64 = 25.0;

/// Annealing temperature [K]
pub const DEFAULT_TEMPERATURE: f64 = 973.0;

/// Time step of sweep runs [s]
pub const DEFAULT_TIMESTEP: f64 = 0.05;

/// Simulated annealing time [s]
pub const DEFAULT_DURATION: f64 = 2.0 * 60.0 * 60.0;

/// Worker threads of a sweep
pub const DEFAULT_WORKERS: usize = 8;

/// Grid spacing [m], domain length divided by the number of points
pub fn default_dx() -> f64 {
    DEFAULT_DOMAIN_MICRONS * 1e-6 / DEFAULT_GRID_POINTS as f64
}

/// Sample positions [µm] of the default grid, endpoints included
pub fn default_positions() -> Vec<f64> {
    crate::data::linspace(0.0, DEFAULT_DOMAIN_MICRONS, DEFAULT_GRID_POINTS)
}

/// Diffusion-couple starting profile: first half 1.0, second half 0.0
///
/// ```rust
/// use diffsim_rs::defaults::step_profile;
///
/// let p = step_profile(4);
/// assert_eq!(p.as_slice(), &[1.0, 1.0, 0.0, 0.0]);
/// ```
pub fn step_profile(points: usize) -> DVector<f64> {
    DVector::from_fn(points, |i, _| if i < points / 2 { 1.0 } else { 0.0 })
}
