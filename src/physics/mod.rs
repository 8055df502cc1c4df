//! Physical inputs
//!
//! This module holds everything the simulation needs to know about the
//! material couple and the applied current, independently of how the
//! equations are discretised:
//!
//! - **Transport model trait**: the seam between physics and numerics
//! - **Material properties**: D(C) and R(C) tables over normalised concentration
//! - **Electromigration**: physical constants, drift coefficient, current direction
//!
//! # Architecture
//!
//! Physical inputs are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to march them (numerics)
//!
//! # Example
//!
//! ```rust
//! use diffsim_rs::physics::{MaterialProperties, drift_coefficient, Direction};
//!
//! let material = MaterialProperties::from_slices(&[1e-14, 1e-13], &[1.0, 2.0]).unwrap();
//! assert_eq!(material.samples(), 2);
//!
//! // z* = 160, 1000 A/cm² reverse bias at 973 K
//! let r = drift_coefficient(160.0, 1000.0, Direction::Reverse, 973.0);
//! assert!(r < 0.0);
//! ```

pub mod electromigration;
pub mod material;
pub mod traits;

pub use electromigration::{
    current_density_si, drift_coefficient, emigration_factor, Direction, BOLTZMANN,
    ELEMENTARY_CHARGE,
};
pub use material::MaterialProperties;
pub use traits::{Divergence, TransportModel};
