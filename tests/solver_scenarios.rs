//! Integration tests: physics + models + solver
//!
//! Full diffusion-couple runs checked against known behaviour: analytic
//! decay for constant diffusivity, mass balance at fixed boundaries and the
//! stability limit of the explicit scheme.

use approx::assert_relative_eq;
use diffsim_rs::defaults::{default_dx, step_profile};
use diffsim_rs::error::DiffsimError;
use diffsim_rs::solver::{
    num_steps_for_duration, optimum_timestep, simulate, DiffusionSolver, ForwardDifferenceSolver,
    SimulationParameters,
};
use nalgebra::DVector;

mod common;
use common::{constant_material, erfc, linear_material, linear_table, max_abs_difference};

// =================================================================================================
// Reference Couple
// =================================================================================================

/// D = R linear from 1e-14 to 1e-13 over 10001 samples, 200-point step, 2 hours
#[test]
fn test_reference_couple_smooths_monotonically() {
    let table = linear_table(10001, 1e-14, 1e-13);
    let init = step_profile(200);
    let dx = default_dx();
    let dt = optimum_timestep(dx, table.max());
    let ndt = num_steps_for_duration(dt, 2.0 * 60.0 * 60.0);

    let profile = simulate(&table, &table, &init, ndt, dt, dx, 0.0, 1.0).unwrap();

    assert_eq!(profile.len(), 200);
    assert_eq!(profile[0], 1.0);
    assert_eq!(profile[199], 0.0);

    for k in 0..199 {
        assert!(
            profile[k + 1] <= profile[k] + 1e-12,
            "profile rises between {} and {}: {} -> {}",
            k,
            k + 1,
            profile[k],
            profile[k + 1]
        );
    }
    assert!(profile.iter().all(|&c| (-1e-9..=1.0 + 1e-9).contains(&c)));

    // D grows with C, so the front leans into the dilute side: the centre
    // sits near 0.64 at this spacing. Dropping the D'·Cx² term moves it out
    // of the band.
    let midpoint = 0.5 * (profile[99] + profile[100]);
    assert!(midpoint > 0.60 && midpoint < 0.68, "midpoint {midpoint}");
}

#[test]
fn test_constant_diffusivity_smooths_symmetrically() {
    let material = constant_material(1e-13, 1.0);
    let init = step_profile(200);
    let params = SimulationParameters::new(5_000, 0.01, 1e-7);

    let profile = ForwardDifferenceSolver::new()
        .simulate(&material, &init, &params)
        .unwrap();

    for k in 0..100 {
        assert_relative_eq!(profile[k] + profile[199 - k], 1.0, epsilon = 1e-9);
    }
    assert_relative_eq!(0.5 * (profile[99] + profile[100]), 0.5, epsilon = 1e-9);
}

#[test]
fn test_hundredfold_timestep_is_unstable() {
    let table = linear_table(10001, 1e-14, 1e-13);
    let init = step_profile(200);
    let dx = default_dx();
    let dt = 100.0 * optimum_timestep(dx, table.max());
    let ndt = num_steps_for_duration(dt, 2.0 * 60.0 * 60.0);

    let err = simulate(&table, &table, &init, ndt, dt, dx, 0.0, 1.0).unwrap_err();

    match err {
        DiffsimError::StabilityFailure { step, dt: failed_dt, cv_factor, .. } => {
            assert!(step >= 1 && step < ndt);
            assert_eq!(failed_dt, dt);
            assert_eq!(cv_factor, 1.0);
        }
        other => panic!("expected a stability failure, got {other}"),
    }
}

#[test]
fn test_simulation_is_deterministic() {
    let material = linear_material(1001, 1e-14, 1e-13);
    let init = step_profile(60);
    let params = SimulationParameters::for_duration(120.0, default_dx(), material.max_diffusivity(), 1.5)
        .unwrap()
        .with_drift(2.0e5);
    let solver = ForwardDifferenceSolver::new();

    let first = solver.simulate(&material, &init, &params).unwrap();
    let second = solver.simulate(&material, &init, &params).unwrap();

    assert_eq!(first, second);
}

// =================================================================================================
// Analytic Checks
// =================================================================================================

/// C(x, t) = ½ erfc(x / 2√(Dt)) for a step at x = 0
#[test]
fn test_constant_diffusivity_matches_erfc() {
    let d = 1e-13;
    let dx = 1e-7;
    let dt = 0.01;
    let t = 10.0;
    let material = constant_material(d, 1.0);
    let params = SimulationParameters::new(num_steps_for_duration(dt, t), dt, dx);

    let profile = ForwardDifferenceSolver::new()
        .simulate(&material, &step_profile(200), &params)
        .unwrap();

    let spread = 2.0 * (d * t).sqrt();
    let analytic = DVector::from_fn(200, |k, _| {
        let x = (k as f64 - 99.5) * dx;
        0.5 * erfc(x / spread)
    });

    let error = max_abs_difference(&profile, &analytic);
    assert!(error < 0.01, "max deviation from erfc {error}");
}

/// Without drift the interior exchanges nothing with the fixed ends while
/// the front is far from them
#[test]
fn test_mass_conserved_without_drift() {
    let material = constant_material(1e-13, 1.0);
    let init = step_profile(200);
    let params = SimulationParameters::new(1_000, 0.01, 1e-7);

    let profile = ForwardDifferenceSolver::new()
        .simulate(&material, &init, &params)
        .unwrap();

    assert_relative_eq!(profile.sum(), init.sum(), max_relative = 1e-12);
}

/// With a constant drift velocity v the saturated left end feeds in v·dt/dx per step
#[test]
fn test_drift_mass_gain_matches_boundary_flux() {
    let d = 1e-13;
    let drift = 1e6;
    let (dt, dx, steps) = (0.01, 1e-7, 1_000);
    let material = constant_material(d, 1.0);
    let init = step_profile(200);
    let params = SimulationParameters::new(steps, dt, dx).with_drift(drift);

    let profile = ForwardDifferenceSolver::new()
        .simulate(&material, &init, &params)
        .unwrap();

    let velocity = drift * d;
    let expected = init.sum() + steps as f64 * velocity * dt / dx;
    assert_relative_eq!(profile.sum(), expected, max_relative = 1e-9);

    // The front has moved right: more material past the original interface
    assert!(profile[100] > 0.5);
}

/// Doubling Cv/Cve doubles every rate, which is the same run with twice the time step
#[test]
fn test_cv_factor_rescales_time() {
    let material = linear_material(1001, 1e-14, 1e-13);
    let init = step_profile(80);
    let dx = default_dx();
    let dt = optimum_timestep(dx, 2.0 * material.max_diffusivity());
    let solver = ForwardDifferenceSolver::new();

    let scaled = solver
        .simulate(&material, &init, &SimulationParameters::new(2_000, dt, dx).with_cv_factor(2.0))
        .unwrap();
    let stretched = solver
        .simulate(&material, &init, &SimulationParameters::new(2_000, 2.0 * dt, dx))
        .unwrap();

    assert!(max_abs_difference(&scaled, &stretched) < 1e-12);
}

// =================================================================================================
// Input Handling
// =================================================================================================

#[test]
fn test_mismatched_tables_are_rejected_before_running() {
    let d = linear_table(11, 1e-14, 1e-13);
    let r = linear_table(12, 1e-14, 1e-13);
    let err = simulate(&d, &r, &step_profile(10), 10, 0.01, 1e-7, 0.0, 1.0).unwrap_err();
    assert!(matches!(err, DiffsimError::LengthMismatch { expected: 11, actual: 12, .. }));
}

#[test]
fn test_out_of_range_initial_profile_fails_at_step_zero() {
    let material = constant_material(1e-13, 1.0);
    let mut init = step_profile(10);
    init[4] = 1.5;

    let err = ForwardDifferenceSolver::new()
        .simulate(&material, &init, &SimulationParameters::new(10, 0.01, 1e-7))
        .unwrap_err();
    assert!(matches!(err, DiffsimError::StabilityFailure { step: 0, position: 4, .. }));
}
