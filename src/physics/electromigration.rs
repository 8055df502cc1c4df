//! Electromigration physics
//!
//! The drift coefficient `r` that multiplies the electromigration term of the
//! transport equation comes from the Nernst-Einstein relation:
//!
//! ```text
//! r = q · j · z* / (k_B · T)
//! ```
//!
//! - **q**   : elementary charge [C]
//! - **j**   : current density [A/m²], signed by direction
//! - **z\*** : effective valence (dimensionless)
//! - **k_B** : Boltzmann constant [J/K]
//! - **T**   : temperature [K]
//!
//! Multiplied by the local resistivity and diffusivity in the model, `r`
//! gives the drift velocity of the migrating species.

use std::fmt;
use std::str::FromStr;

use crate::error::DiffsimError;

/// Elementary charge [C], to the precision the fitted datasets were produced with
pub const ELEMENTARY_CHARGE: f64 = 1.602e-19;

/// Boltzmann constant [J/K], to the precision the fitted datasets were produced with
pub const BOLTZMANN: f64 = 1.381e-23;

/// A/cm² → A/m²
const AMPS_PER_CM2_TO_SI: f64 = 100.0 * 100.0;

/// Drift coefficient from effective valence, current density [A/m²] and temperature [K]
#[inline]
pub fn emigration_factor(z: f64, current_density: f64, temperature: f64) -> f64 {
    (ELEMENTARY_CHARGE * current_density * z) / (BOLTZMANN * temperature)
}

/// Converts a current density from A/cm² (the unit experiments are tabulated in) to A/m²
#[inline]
pub fn current_density_si(amps_per_cm2: f64) -> f64 {
    amps_per_cm2 * AMPS_PER_CM2_TO_SI
}

// =================================================================================================
// Current Direction
// =================================================================================================

/// Direction in which the current is applied across the couple
///
/// Experiments are run in both directions. Reverse bias flips the sign of the
/// current and therefore of the drift coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Both directions, forward first
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reverse];

    /// Applies the direction to a current magnitude
    #[inline]
    pub fn signed(&self, current: f64) -> f64 {
        match self {
            Direction::Forward => current.abs(),
            Direction::Reverse => -current.abs(),
        }
    }

    /// Lower-case label used in file names
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = DiffsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "reverse" => Ok(Direction::Reverse),
            other => Err(DiffsimError::InvalidParameter(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

/// Drift coefficient for a current given in A/cm² and a direction
pub fn drift_coefficient(z: f64, amps_per_cm2: f64, direction: Direction, temperature: f64) -> f64 {
    emigration_factor(z, current_density_si(direction.signed(amps_per_cm2)), temperature)
}
