//! Simulation scenario definition
//!
//! A scenario combines a transport model with the initial profile and the
//! fixed end values taken from it.

use std::fmt;

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};
use crate::physics::TransportModel;
use crate::solver::boundary::FixedBoundaries;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Transport model (equations)
/// - Initial concentration profile
/// - Fixed boundary values (the ends of the initial profile)
///
/// # Design
///
/// The same scenario can be marched with different time steps or solvers.
/// This is the "WHAT to solve" (not "HOW to solve").
pub struct Scenario {
    /// Transport model (equations)
    pub model: Box<dyn TransportModel>,

    /// Concentration profile at t = 0
    pub initial: DVector<f64>,

    /// Values held at the domain ends
    pub boundaries: FixedBoundaries,
}

impl Scenario {
    /// Creates a scenario, checking the profile against the model grid
    ///
    /// # Errors
    ///
    /// - [`DiffsimError::EmptyInput`] for an empty profile
    /// - [`DiffsimError::LengthMismatch`] when the profile length differs
    ///   from `model.points()`
    pub fn new(model: Box<dyn TransportModel>, initial: DVector<f64>) -> Result<Self> {
        let boundaries = FixedBoundaries::from_profile(&initial)?;
        if initial.len() != model.points() {
            return Err(DiffsimError::length_mismatch(
                "model grid/initial profile",
                model.points(),
                initial.len(),
            ));
        }
        Ok(Self {
            model,
            initial,
            boundaries,
        })
    }

    /// Get model name
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Number of spatial grid points
    pub fn points(&self) -> usize {
        self.initial.len()
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("model", &self.model_name())
            .field("points", &self.points())
            .field("boundaries", &self.boundaries)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
