//! Alignment and comparison of simulated and experimental profiles
//!
//! - **`shift`**: padded least-squares search for the best integer shift
//! - **`engine`**: least-squares error, shift application and calibration
//!
//! Experimental profiles are measured on an arbitrary origin, so a model
//! profile is only comparable to one once the two are lined up. Calibration
//! returns the alignment as a [`Calibration`] value that callers pass on
//! explicitly.

pub mod engine;
pub mod shift;

pub use engine::{apply_shift, calibrate, least_squares, shifted_least_squares, Calibration};
pub use shift::{find_shift, LEFT_PAD, RIGHT_PAD};
