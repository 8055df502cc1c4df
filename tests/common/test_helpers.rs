//! Helper functions for integration tests

use diffsim_rs::physics::MaterialProperties;
use nalgebra::DVector;

/// `samples` values spaced linearly from `low` to `high`
pub fn linear_table(samples: usize, low: f64, high: f64) -> DVector<f64> {
    DVector::from_fn(samples, |i, _| low + (high - low) * i as f64 / (samples - 1) as f64)
}

/// D = R = linear ramp from `low` to `high`
pub fn linear_material(samples: usize, low: f64, high: f64) -> MaterialProperties {
    let table = linear_table(samples, low, high);
    MaterialProperties::new(table.clone(), table).unwrap()
}

/// Constant D and R over an 11-sample table
pub fn constant_material(diffusivity: f64, resistivity: f64) -> MaterialProperties {
    MaterialProperties::from_slices(&[diffusivity; 11], &[resistivity; 11]).unwrap()
}

/// Complementary error function
///
/// Abramowitz & Stegun 7.1.26, absolute error below 1.5e-7.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * z);
    let poly = t
        * (0.254_829_592
            + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429))));
    let erfc_abs = poly * (-z * z).exp();
    if x >= 0.0 { erfc_abs } else { 2.0 - erfc_abs }
}

/// Largest pointwise distance between two profiles
pub fn max_abs_difference(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    assert_eq!(a.len(), b.len(), "profiles differ in length");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
