//! Integration tests: solver output + alignment + comparison

use diffsim_rs::comparison::{apply_shift, calibrate, find_shift, least_squares, shifted_least_squares};
use diffsim_rs::defaults::step_profile;
use diffsim_rs::solver::{DiffusionSolver, ForwardDifferenceSolver, SimulationParameters};
use nalgebra::DVector;

mod common;
use common::constant_material;

fn smoothed_front(points: usize) -> DVector<f64> {
    let material = constant_material(1e-13, 1.0);
    ForwardDifferenceSolver::new()
        .simulate(&material, &step_profile(points), &SimulationParameters::new(500, 0.01, 1e-7))
        .unwrap()
}

#[test]
fn test_simulated_profile_aligns_with_itself() {
    let profile = smoothed_front(120);
    assert_eq!(find_shift(&profile, &profile).unwrap(), 0);

    let calibration = calibrate(&profile, &profile).unwrap();
    assert_eq!(calibration.shift, 0);
    assert_eq!(calibration.least_squares, 0.0);
}

#[test]
fn test_calibration_recovers_displaced_experiment() {
    let model = smoothed_front(120);
    // Experiment measured with its origin 7 points to the left
    let experiment = apply_shift(&model, 7).unwrap();

    let calibration = calibrate(&model, &experiment).unwrap();

    assert_eq!(calibration.shift, 7);
    assert!(calibration.least_squares > 0.0);
    assert_eq!(calibration.shifted_least_squares(&model, &experiment).unwrap(), 0.0);
    assert_eq!(
        shifted_least_squares(&model, &experiment, calibration.shift).unwrap(),
        0.0
    );
}

#[test]
fn test_shift_and_reverse_restore_interior() {
    let model = smoothed_front(120);
    let experiment = apply_shift(&model, -5).unwrap();

    let there = calibrate(&model, &experiment).unwrap();
    assert_eq!(there.shift, -5);
    let moved = there.apply(&model).unwrap();

    let back = calibrate(&moved, &model).unwrap();
    assert_eq!(back.shift, 5);
    let restored = back.apply(&moved).unwrap();

    // Everything except the re-padded left edge is recovered
    for k in 5..120 {
        assert_eq!(restored[k], model[k]);
    }
}

#[test]
fn test_least_squares_is_symmetric_on_profiles() {
    let a = smoothed_front(80);
    let b = step_profile(80);
    assert_eq!(least_squares(&a, &a).unwrap(), 0.0);
    assert_eq!(least_squares(&a, &b).unwrap(), least_squares(&b, &a).unwrap());
}
