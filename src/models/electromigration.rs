//! Drift-diffusion model for a binary couple under electromigration
//!
//! # Mathematical Background
//!
//! ## Transport Equation (1D)
//!
//! The normalised concentration C(x,t) of the migrating species evolves by
//! concentration-dependent diffusion plus a drift driven by the applied
//! current:
//!
//! ```text
//! ∂C/∂t = ∂/∂x( D(C)·∂C/∂x ) − ∂/∂x( r·D(C)·R(C)·C )
//! ```
//!
//! Where:
//! - **D(C)** : Diffusivity [m²/s], already scaled by the Cv/Cve factor
//! - **R(C)** : Resistivity, multiplies the local driving force
//! - **r**    : Drift coefficient q·j·z*/(k_B·T), sign set by current direction
//!
//! ## Expanded Form
//!
//! With D' = dD/dC and R' = dR/dC taken from the tables:
//!
//! ```text
//! ∂C/∂t = D·Cxx + D'·Cx² − r·(D'·R·C + D·R'·C + D·R)·Cx
//! ```
//!
//! ## Spatial Discretization
//!
//! - Diffusion: centred differences for Cx and Cxx
//! - Drift: first-order upwind on the sign of the local drift velocity
//!   `a = r·(D'·R·C + D·R'·C + D·R)`
//!
//! ```text
//! Cx_up = (C[k] − C[k−1]) / dx   if a > 0
//!       = (C[k+1] − C[k]) / dx   otherwise
//! ```
//!
//! Material properties are looked up by **local concentration**, rounded to
//! the nearest table sample. A concentration that rounds outside the table is
//! reported as [`Divergence`].
//!
//! # Example Usage
//!
//! ```rust
//! use diffsim_rs::models::ElectromigrationModel;
//! use diffsim_rs::physics::{MaterialProperties, TransportModel};
//! use nalgebra::DVector;
//!
//! let material = MaterialProperties::from_slices(&[1e-14, 1e-13], &[1.0, 1.0]).unwrap();
//! let model = ElectromigrationModel::new(material, 50, 2.5e-7, 0.0).unwrap();
//!
//! let profile = DVector::from_fn(50, |i, _| if i < 25 { 1.0 } else { 0.0 });
//! let mut rate = DVector::zeros(50);
//! model.rate(&profile, &mut rate).unwrap();
//!
//! // The step front spreads: left side loses, right side gains
//! assert!(rate[24] < 0.0);
//! assert!(rate[25] > 0.0);
//! ```

use std::ops::RangeInclusive;

use nalgebra::DVector;

use crate::error::{DiffsimError, Result};
use crate::physics::{Divergence, MaterialProperties, TransportModel};

// =================================================================================================
// Electromigration Model
// =================================================================================================

/// Discretised drift-diffusion right-hand side
///
/// # Model Parameters
///
/// - **material** : D(C) and R(C) tables, D already multiplied by Cv/Cve
/// - **points** : Number of spatial grid points
/// - **dx** : Spatial step [m]
/// - **drift** : Drift coefficient r, signed by current direction
///
/// # Thread Safety
///
/// All fields are owned and immutable after construction, so the model is
/// `Send + Sync` and may be evaluated from any worker.
#[derive(Clone, Debug)]
pub struct ElectromigrationModel {
    material: MaterialProperties,
    points: usize,
    dx: f64,
    drift: f64,
}

impl ElectromigrationModel {
    /// Creates the model over `points` grid points spaced `dx` apart
    ///
    /// # Errors
    ///
    /// - [`DiffsimError::EmptyInput`] when `points == 0`
    /// - [`DiffsimError::InvalidParameter`] when `dx` is not positive and finite,
    ///   or `drift` is not finite
    pub fn new(material: MaterialProperties, points: usize, dx: f64, drift: f64) -> Result<Self> {
        if points == 0 {
            return Err(DiffsimError::EmptyInput("concentration profile"));
        }
        if !(dx.is_finite() && dx > 0.0) {
            return Err(DiffsimError::InvalidParameter(format!(
                "dx must be positive and finite, got {dx}"
            )));
        }
        if !drift.is_finite() {
            return Err(DiffsimError::InvalidParameter(format!(
                "drift coefficient must be finite, got {drift}"
            )));
        }

        Ok(Self {
            material,
            points,
            dx,
            drift,
        })
    }

    // ==================== Accessors ====================

    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[inline]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    #[inline]
    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    // ==================== Physics Helpers ====================

    /// Table index for the concentration at grid point `position`
    #[inline]
    fn lookup(&self, value: f64, position: usize) -> std::result::Result<usize, Divergence> {
        self.material
            .index_of(value)
            .ok_or(Divergence { position, value })
    }

    /// Drift velocity factor multiplying Cx, r·(D'·R·C + D·R'·C + D·R)
    #[inline]
    fn drift_velocity(&self, c: f64, d: f64, res: f64, d_slope: f64, r_slope: f64) -> f64 {
        self.drift * (d_slope * res * c + d * r_slope * c + d * res)
    }
}

impl TransportModel for ElectromigrationModel {
    fn points(&self) -> usize {
        self.points
    }

    fn rate(&self, profile: &DVector<f64>, rate: &mut DVector<f64>) -> std::result::Result<(), Divergence> {
        let n = self.points;
        if n < 3 {
            return Ok(());
        }

        let inv_dx = 1.0 / self.dx;
        let inv_dx2 = inv_dx * inv_dx;
        let diffusivity = self.material.diffusivity();
        let resistivity = self.material.resistivity();

        for k in 1..n - 1 {
            let (left, c, right) = (profile[k - 1], profile[k], profile[k + 1]);

            // Neighbours must also be inside the tables
            self.lookup(left, k - 1)?;
            self.lookup(right, k + 1)?;
            let idx = self.lookup(c, k)?;

            let d = diffusivity[idx];
            let res = resistivity[idx];
            let d_slope = self.material.diffusivity_slope(idx);
            let r_slope = self.material.resistivity_slope(idx);

            // ====== Diffusion: D·Cxx + D'·Cx² ======
            let cx = 0.5 * (right - left) * inv_dx;
            let cxx = (right - 2.0 * c + left) * inv_dx2;
            let diffusion = d * cxx + d_slope * cx * cx;

            // ====== Drift: upwind on the sign of the velocity ======
            let velocity = self.drift_velocity(c, d, res, d_slope, r_slope);
            let cx_upwind = if velocity > 0.0 {
                (c - left) * inv_dx
            } else {
                (right - c) * inv_dx
            };

            rate[k] = diffusion - velocity * cx_upwind;
        }

        Ok(())
    }

    fn admissible(&self) -> RangeInclusive<f64> {
        self.material.covered_range()
    }

    fn name(&self) -> &str {
        "Electromigration Drift-Diffusion"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
