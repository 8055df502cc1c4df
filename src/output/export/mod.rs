//! Export of results for external analysis
//!
//! | Layout            | Writer                   | Reader               |
//! |-------------------|--------------------------|----------------------|
//! | Error surface     | [`write_surface_csv`]    | [`read_surface_csv`] |
//! | Single comparison | [`write_comparison_csv`] |                      |

pub mod csv;

pub use self::csv::{
    read_surface_csv, write_comparison_csv, write_surface_csv, CsvConfig, CsvMetadata, UNSTABLE_MARKER,
};
