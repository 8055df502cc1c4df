//! CSV export of sweep and comparison results
//!
//! Two layouts are written:
//!
//! ## Error surface
//!
//! ```csv
//! # Electromigration Parameter Search
//! # Generated: 2026-02-11T15:30:00+00:00
//! # Solver: Forward Difference
//! # Temperature: 973 K
//! #
//! z*\Cv/Cve,1.000000e0,1.500000e0
//! 1.000000e2,4.215000e0,unstable
//! 2.000000e2,3.118000e0,2.907000e0
//! ```
//!
//! Rows follow z*, columns follow Cv/Cve. Cells whose simulation diverged
//! hold the word `unstable`. [`read_surface_csv`] reads this layout back,
//! so a finished sweep can be re-analysed without recomputing it.
//!
//! ## Single comparison
//!
//! ```csv
//! Position (um),Model,Experiment
//! 0.000000e0,1.000000e0,1.000000e0
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;

use crate::error::{DiffsimError, Result};
use crate::search::ErrorSurface;

/// Marker written in place of the value of an unstable cell
pub const UNSTABLE_MARKER: &str = "unstable";

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use diffsim_rs::output::export::{CsvConfig, CsvMetadata};
///
/// let config = CsvConfig::default()
///     .precision(10)
///     .with_metadata(CsvMetadata::from_search("Forward Difference", 973.0, 144_000));
/// assert!(config.include_metadata);
/// ```
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Significant decimals in scientific notation (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only the fields that are set are written.
#[derive(Clone, Debug, Default)]
pub struct CsvMetadata {
    pub solver_name: Option<String>,

    /// Annealing temperature [K]
    pub temperature: Option<f64>,

    pub time_steps: Option<usize>,

    /// Time step [s]
    pub dt: Option<f64>,

    /// Grid spacing [m]
    pub dx: Option<f64>,

    /// Additional key/value lines
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    pub fn from_search(solver: &str, temperature: f64, time_steps: usize) -> Self {
        Self {
            solver_name: Some(solver.to_string()),
            temperature: Some(temperature),
            time_steps: Some(time_steps),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header(out: &mut impl Write, title: &str, metadata: &CsvMetadata) -> Result<()> {
    writeln!(out, "# {}", title)?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(temperature) = metadata.temperature {
        writeln!(out, "# Temperature: {} K", temperature)?;
    }
    if let Some(time_steps) = metadata.time_steps {
        writeln!(out, "# Time Steps: {}", time_steps)?;
    }
    if let Some(dt) = metadata.dt {
        writeln!(out, "# dt: {} s", dt)?;
    }
    if let Some(dx) = metadata.dx {
        writeln!(out, "# dx: {} m", dx)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")?;
    Ok(())
}

fn write_header(out: &mut impl Write, title: &str, config: &CsvConfig) -> Result<()> {
    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(out, title, metadata)?;
        }
    }
    Ok(())
}

/// Scientific notation with the configured precision
fn format_number(value: f64, config: &CsvConfig) -> String {
    format!("{:.prec$e}", value, prec = config.precision)
}

// =============================================================================
// Export Functions
// =============================================================================

/// Writes an error surface, unstable cells marked as `unstable`
pub fn write_surface_csv(surface: &ErrorSurface, path: impl AsRef<Path>, config: Option<&CsvConfig>) -> Result<()> {
    let binding = CsvConfig::default();
    let config = config.unwrap_or(&binding);
    let d = config.delimiter;

    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, "Electromigration Parameter Search", config)?;

    // ====== Column axis ======
    write!(out, "z*\\Cv/Cve")?;
    for cv in surface.cols() {
        write!(out, "{}{}", d, format_number(*cv, config))?;
    }
    writeln!(out)?;

    // ====== One row per z* ======
    for (row, z) in surface.rows().iter().enumerate() {
        write!(out, "{}", format_number(*z, config))?;
        for col in 0..surface.cols().len() {
            match surface.get(row, col) {
                Some(value) => write!(out, "{}{}", d, format_number(value, config))?,
                None => write!(out, "{}{}", d, UNSTABLE_MARKER)?,
            }
        }
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

/// Writes a simulated profile next to the experiment it was compared with
///
/// # Errors
///
/// - [`DiffsimError::EmptyInput`] for empty positions
/// - [`DiffsimError::LengthMismatch`] when the three columns differ in length
pub fn write_comparison_csv(
    x: &[f64],
    model: &[f64],
    experiment: &[f64],
    path: impl AsRef<Path>,
    config: Option<&CsvConfig>,
) -> Result<()> {
    if x.is_empty() {
        return Err(DiffsimError::EmptyInput("comparison positions"));
    }
    if model.len() != x.len() {
        return Err(DiffsimError::length_mismatch("comparison model", x.len(), model.len()));
    }
    if experiment.len() != x.len() {
        return Err(DiffsimError::length_mismatch(
            "comparison experiment",
            x.len(),
            experiment.len(),
        ));
    }

    let binding = CsvConfig::default();
    let config = config.unwrap_or(&binding);
    let d = config.delimiter;

    let mut out = BufWriter::new(File::create(path)?);
    write_header(&mut out, "Electromigration Single Comparison", config)?;

    writeln!(out, "Position (um){d}Model{d}Experiment")?;
    for ((xi, mi), ei) in x.iter().zip(model).zip(experiment) {
        writeln!(
            out,
            "{}{d}{}{d}{}",
            format_number(*xi, config),
            format_number(*mi, config),
            format_number(*ei, config)
        )?;
    }

    out.flush()?;
    Ok(())
}

// =============================================================================
// Import
// =============================================================================

/// Reads a surface written by [`write_surface_csv`] with the default delimiter
pub fn read_surface_csv(path: impl AsRef<Path>) -> Result<ErrorSurface> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)?;

    let parse = |field: &str, line: usize| -> Result<f64> {
        field.parse::<f64>().map_err(|e| DiffsimError::Parse {
            path: path.display().to_string(),
            line,
            message: format!("'{field}': {e}"),
        })
    };

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| DiffsimError::MissingData(format!("{} holds no surface", path.display())))??;
    let header_line = header.position().map_or(0, |p| p.line() as usize);
    let cols = header
        .iter()
        .skip(1)
        .map(|f| parse(f, header_line))
        .collect::<Result<Vec<f64>>>()?;

    let mut rows = Vec::new();
    let mut cells = Vec::new();
    let mut unstable = Vec::new();

    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let row = rows.len();
        let mut fields = record.iter();

        let z = fields.next().ok_or_else(|| DiffsimError::Parse {
            path: path.display().to_string(),
            line,
            message: "empty row".to_string(),
        })?;
        rows.push(parse(z, line)?);

        for (col, field) in fields.enumerate() {
            if field == UNSTABLE_MARKER {
                unstable.push((row, col));
                cells.push(0.0);
            } else {
                cells.push(parse(field, line)?);
            }
        }
    }

    if rows.is_empty() || cols.is_empty() {
        return Err(DiffsimError::MissingData(format!("{} holds no surface", path.display())));
    }

    // Cells arrive row by row
    let values = DMatrix::from_row_slice(rows.len(), cols.len(), &cells);
    ErrorSurface::new(rows, cols, values, unstable)
}

// =================================================================================================
// Tests
// =================================================================================================
