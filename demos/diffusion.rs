//! Diffusion couple under forward and reverse current
//!
//! ∂C/∂t = D(C)·∂²C/∂x² + D'(C)·(∂C/∂x)² − r·(D'RC + DR'C + DR)·∂C/∂x
//!
//! Runs the same Ni/Cu-like couple three times (no current, forward bias,
//! reverse bias) and writes each final profile next to the no-current run.

use diffsim_rs::defaults::{default_dx, default_positions, step_profile, DEFAULT_GRID_POINTS, DEFAULT_TEMPERATURE};
use diffsim_rs::output::write_comparison_csv;
use diffsim_rs::physics::{drift_coefficient, Direction, MaterialProperties};
use diffsim_rs::solver::{DiffusionSolver, ForwardDifferenceSolver, SimulationParameters};
use nalgebra::DVector;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Electromigration Diffusion Couple ===\n");

    // Material: D rises tenfold and R doubles from the dilute to the rich side
    let samples = 1001;
    let diffusivity = DVector::from_fn(samples, |i, _| 1e-14 + 9e-14 * i as f64 / (samples - 1) as f64);
    let resistivity = DVector::from_fn(samples, |i, _| 7e-8 * (1.0 + i as f64 / (samples - 1) as f64));
    let material = MaterialProperties::new(diffusivity, resistivity)?;

    // Physical parameters
    let z_star = 160.0;
    let current = 1000.0; // A/cm²
    let cv_factor = 2.0;
    let duration = 2.0 * 60.0 * 60.0;

    let dx = default_dx();
    let params = SimulationParameters::for_duration(duration, dx, material.max_diffusivity(), cv_factor)?;

    println!("Physical Parameters:");
    println!("  Grid: {} points, dx = {:e} m", DEFAULT_GRID_POINTS, dx);
    println!("  Temperature: {} K", DEFAULT_TEMPERATURE);
    println!("  z* = {}, j = {} A/cm², Cv/Cve = {}", z_star, current, cv_factor);
    println!("\nSimulation:");
    println!("  dt = {:.4} s, {} steps ({} s)\n", params.dt, params.num_timesteps, params.total_time());

    let solver = ForwardDifferenceSolver::new();
    let initial = step_profile(DEFAULT_GRID_POINTS);
    let x = default_positions();

    let baseline = solver.simulate(&material, &initial, &params)?;

    for direction in Direction::ALL {
        let drift = drift_coefficient(z_star, current, direction, DEFAULT_TEMPERATURE);
        let profile = solver.simulate(&material, &initial, &params.with_drift(drift))?;

        let moved: f64 = profile.sum() - baseline.sum();
        println!(
            "{:>8}: r = {:+.3e}, net material moved = {:+.4} grid units",
            direction, drift, moved
        );

        let path = format!("diffusion_{}.csv", direction);
        write_comparison_csv(&x, profile.as_slice(), baseline.as_slice(), &path, None)?;
        println!("          profile written to {}", path);
    }

    Ok(())
}
