//! diffsim-rs: Electromigration Interdiffusion Simulation
//!
//! Simulates one-dimensional interdiffusion in a binary couple under an
//! applied electric current, lines simulated profiles up with measured ones,
//! and searches the effective valence z* and the vacancy multiplier Cv/Cve
//! that best reproduce a set of experiments.
//!
//! # Architecture
//!
//! diffsim-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Transport models define the equations (what to solve)
//!    - Diffusion solvers march them in time (how to solve)
//!
//! 2. **Explicit, value-based state**
//!    - Calibrations are returned as values, never stored in a shared engine
//!    - Resampled input tables are memoised per datastore, not per process
//!    - Sweep workers share their inputs read-only and each own one output cell
//!
//! # Quick Start
//!
//! ```rust
//! use diffsim_rs::prelude::*;
//! use nalgebra::DVector;
//!
//! # fn main() -> diffsim_rs::error::Result<()> {
//! // 1. Material tables over C in [0, 1]
//! let d = DVector::from_fn(101, |i, _| 1e-14 + 9e-14 * i as f64 / 100.0);
//! let material = MaterialProperties::new(d.clone(), d)?;
//!
//! // 2. Diffusion couple and time stepping
//! let initial = step_profile(40);
//! let params = SimulationParameters::for_duration(60.0, 2.5e-7, material.max_diffusivity(), 1.0)?;
//!
//! // 3. Run and compare
//! let profile = ForwardDifferenceSolver::new().simulate(&material, &initial, &params)?;
//! let calibration = calibrate(&profile, &initial)?;
//! println!("error {} at shift {}", calibration.least_squares, calibration.shift);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`physics`]: material tables, constants, transport model trait
//! - [`models`]: the discretised drift-diffusion right-hand side
//! - [`solver`]: explicit time integration and stability helpers
//! - [`comparison`]: shift alignment and least-squares comparison
//! - [`search`]: concurrent (z*, Cv/Cve) sweep and error surfaces
//! - [`data`]: dataset directory reader and resampling
//! - [`output`]: CSV export and re-import
//! - [`defaults`]: settings the reference datasets were fitted with

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub mod comparison;
pub mod search;

// Input / output
pub mod data;
pub mod defaults;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use diffsim_rs::prelude::*;
    //! ```
    pub use crate::comparison::{apply_shift, calibrate, find_shift, least_squares, Calibration};
    pub use crate::defaults::step_profile;
    pub use crate::error::{DiffsimError, Result};
    pub use crate::physics::{drift_coefficient, Direction, MaterialProperties, TransportModel};
    pub use crate::search::{Condition, ErrorSurface, ParameterSearch, SearchConfig, SearchContext};
    pub use crate::solver::{
        optimum_timestep, DiffusionSolver, ForwardDifferenceSolver, SimulationParameters,
    };
}
