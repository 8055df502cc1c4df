//! Transport models for interdiffusion simulation
//!
//! All models implement the [`TransportModel`](crate::physics::TransportModel) trait.
//! The solver calls `rate` at each time step: models are responsible for the
//! physics (diffusion, electromigration drift), the solver for the time
//! integration and the fixed boundary values.
//!
//! # Available Models
//!
//! ## [`ElectromigrationModel`]
//!
//! Concentration-dependent diffusion in a binary couple with a drift term
//! driven by an applied current. Diffusivity and resistivity are read from
//! tables indexed by local concentration.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod electromigration;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use electromigration::ElectromigrationModel;
