//! Parameter search over effective valence and diffusivity multiplier
//!
//! - **`grid`**: parameter ranges and their Cartesian product
//! - **`surface`**: the resulting error surface and its analysis
//! - **`engine`**: the concurrent sweep and single-cell comparisons
//!
//! A sweep simulates every (z*, Cv/Cve) cell under every experimental
//! condition, sums the least-squares errors into an [`ErrorSurface`] and
//! flags the cells whose simulation diverged.

pub mod engine;
pub mod grid;
pub mod surface;

pub use engine::{
    run_single_comparison, Condition, ParameterSearch, SearchConfig, SearchContext, SearchReport,
    SingleComparison,
};
pub use grid::{arange, GridCell, ParameterGrid};
pub use surface::{nearest_index, ErrorSurface};
