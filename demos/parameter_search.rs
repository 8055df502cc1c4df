//! Search for the effective valence and vacancy multiplier of a couple
//!
//! ```bash
//! # Synthetic experiments generated from z* = 200, Cv/Cve = 2
//! cargo run --release --example parameter_search
//!
//! # Dataset directory holding NiCu_Diffusivity_973K.csv etc.
//! cargo run --release --example parameter_search -- path/to/data NiCu
//! ```
//!
//! Forward and reverse sweeps are run separately, written to CSV, then
//! multiplied into one map whose minimum is the combined best fit.

use diffsim_rs::data::InputDatastore;
use diffsim_rs::defaults::{default_dx, default_positions, step_profile, DEFAULT_GRID_POINTS, DEFAULT_TEMPERATURE};
use diffsim_rs::output::{write_surface_csv, CsvConfig, CsvMetadata};
use diffsim_rs::physics::{drift_coefficient, Direction, MaterialProperties};
use diffsim_rs::search::{arange, Condition, ErrorSurface, ParameterSearch, SearchConfig, SearchContext};
use diffsim_rs::solver::{num_steps_for_duration, DiffusionSolver, ForwardDifferenceSolver, SimulationParameters};
use nalgebra::DVector;
use std::error::Error;
use std::io::Write;

/// Experiments simulated at a known (z*, Cv/Cve) for 1000 and 2000 A/cm²
fn synthetic_conditions(
    material: &MaterialProperties,
    initial: &DVector<f64>,
    timing: SimulationParameters,
    direction: Direction,
) -> Result<Vec<Condition>, Box<dyn Error>> {
    let solver = ForwardDifferenceSolver::new();
    let mut conditions = Vec::new();
    for current in [1000.0, 2000.0] {
        let drift = drift_coefficient(200.0, current, direction, DEFAULT_TEMPERATURE);
        let experiment = solver.simulate(material, initial, &timing.with_drift(drift).with_cv_factor(2.0))?;
        conditions.push(Condition::new(current, direction, experiment));
    }
    Ok(conditions)
}

fn report(label: &str, surface: &ErrorSurface) {
    match surface.argmin() {
        Some((row, col, error)) => {
            println!(
                "  {}: best z* = {}, Cv/Cve = {} (error {:.4e}, {} unstable cells)",
                label,
                surface.rows()[row],
                surface.cols()[col],
                error,
                surface.unstable_count()
            );
            if let Some((lo, hi)) = surface.row_bounds_below(row, 2.0 * error.max(f64::MIN_POSITIVE)) {
                println!(
                    "        Cv/Cve within 2× of the minimum: [{}, {}]",
                    surface.cols()[lo],
                    surface.cols()[hi]
                );
            }
        }
        None => println!("  {}: every cell was unstable", label),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Electromigration Parameter Search ===\n");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dt = 0.05;
    let timing = SimulationParameters::new(num_steps_for_duration(dt, 600.0), dt, default_dx());
    let initial = step_profile(DEFAULT_GRID_POINTS);
    let x = default_positions();

    let z_values = arange(100.0, 400.0, 50.0)?;
    let cv_values = arange(1.0, 4.0, 0.5)?;

    let store = match args.first() {
        Some(dir) => Some(InputDatastore::open(dir, args.get(1).map_or("NiCu", String::as_str))?),
        None => None,
    };
    let material = match &store {
        Some(store) => store.material(1001, DEFAULT_TEMPERATURE)?,
        None => {
            let d = DVector::from_fn(1001, |i, _| 1e-14 + 9e-14 * i as f64 / 1000.0);
            let r = DVector::from_fn(1001, |i, _| 7e-8 * (1.0 + i as f64 / 1000.0));
            MaterialProperties::new(d, r)?
        }
    };

    let config = SearchConfig::default().with_timing(timing);
    let search = ParameterSearch::new(config);
    let mut surfaces = Vec::new();

    for direction in Direction::ALL {
        let conditions = match &store {
            Some(store) => store.experiment_conditions(direction, &x, DEFAULT_TEMPERATURE)?,
            None => synthetic_conditions(&material, &initial, timing, direction)?,
        };
        let context = SearchContext::new(material.clone(), initial.clone(), DEFAULT_TEMPERATURE)?
            .with_conditions(conditions)?;

        let total = z_values.len() * cv_values.len();
        let result = search.search(&z_values, &cv_values, &context, |done| {
            print!("\r{} bias: {}/{} cells", direction, done, total);
            let _ = std::io::stdout().flush();
        })?;
        println!(" in {:.2?}", result.elapsed);

        let mut metadata = CsvMetadata::from_search(search.solver().name(), DEFAULT_TEMPERATURE, timing.num_timesteps);
        metadata.add_custom("Direction", direction.label());
        let path = format!("searchmap_{}.csv", direction);
        write_surface_csv(&result.surface, &path, Some(&CsvConfig::default().with_metadata(metadata)))?;

        surfaces.push((direction, result.surface));
    }

    println!("\nResults:");
    for (direction, surface) in &surfaces {
        report(direction.label(), surface);
    }
    if let [(_, forward), (_, reverse)] = surfaces.as_slice() {
        report("combined", &forward.combine(reverse)?);
    }

    Ok(())
}
