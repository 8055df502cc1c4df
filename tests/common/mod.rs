//! Common utilities for integration tests
#![allow(dead_code)]

pub mod mock_solvers;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_solvers::{CountingSolver, ScaledProfileSolver};
pub use test_helpers::{constant_material, erfc, linear_material, linear_table, max_abs_difference};
