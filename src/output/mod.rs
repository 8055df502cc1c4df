//! Output of sweep and comparison results
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! Surfaces are written as a z* × Cv/Cve table and can be read back for
//! later analysis; single comparisons are written as three columns.
//!
//! ```rust,no_run
//! use diffsim_rs::output::{read_surface_csv, write_surface_csv};
//! # fn run(surface: &diffsim_rs::search::ErrorSurface) -> diffsim_rs::error::Result<()> {
//! write_surface_csv(surface, "forward.csv", None)?;
//! let again = read_surface_csv("forward.csv")?;
//! assert_eq!(again.shape(), surface.shape());
//! # Ok(())
//! # }
//! ```

pub mod export;

pub use export::{
    read_surface_csv, write_comparison_csv, write_surface_csv, CsvConfig, CsvMetadata, UNSTABLE_MARKER,
};
