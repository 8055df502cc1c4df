//! Input data: material property tables and experimental profiles
//!
//! - **`interpolate`**: `linspace`, `LinearInterpolator`
//! - **`datastore`**: `InputDatastore` over a dataset directory
//!
//! # Example
//!
//! ```rust,no_run
//! use diffsim_rs::data::InputDatastore;
//! use diffsim_rs::defaults::{default_positions, DEFAULT_PROPERTY_SAMPLES, DEFAULT_TEMPERATURE};
//! use diffsim_rs::physics::Direction;
//!
//! # fn main() -> diffsim_rs::error::Result<()> {
//! let store = InputDatastore::open("data", "NiCu")?;
//! let material = store.material(DEFAULT_PROPERTY_SAMPLES, DEFAULT_TEMPERATURE)?;
//! let forward = store.experiment_conditions(Direction::Forward, &default_positions(), DEFAULT_TEMPERATURE)?;
//! println!("{} samples, {} forward experiments", material.samples(), forward.len());
//! # Ok(())
//! # }
//! ```

pub mod datastore;
pub mod interpolate;

pub use datastore::{current_key, read_experiment_table, read_property_table, ExperimentTable, InputDatastore};
pub use interpolate::{linspace, LinearInterpolator};
