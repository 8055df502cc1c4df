//! Numerical methods for marching transport models through time
//!
//! This module contains concrete implementations of the
//! [`DiffusionSolver`](crate::solver::DiffusionSolver) trait.
//!
//! # Available Methods
//!
//! - **[`ForwardDifferenceSolver`]**: explicit forward-time update
//!   - Order: First-order O(dt)
//!   - Cost: 1 model evaluation per step
//!   - Stability: conditional, time step from
//!     [`optimum_timestep`](crate::solver::optimum_timestep)
//!
//! Each solver is stateless and reusable across runs and threads.

pub mod explicit;

pub use explicit::ForwardDifferenceSolver;
