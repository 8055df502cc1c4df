//! Simulation input files
//!
//! A dataset directory holds, per temperature `T` (in kelvin):
//!
//! ```text
//! {prefix}_Diffusivity_{T}K.csv             header line, then "C  D(C)" rows
//! {prefix}_Resistivity_{T}K.csv             header line, then "C  R(C)" rows
//! {prefix}_Experimental_forward_{T}K.csv    see below
//! {prefix}_Experimental_reverse_{T}K.csv
//! ```
//!
//! Property rows may be separated by whitespace or commas. Experimental
//! files are comma separated: the first row carries the current density of
//! every column in A/cm² (the first cell is ignored), every further row is a
//! position in µm followed by one concentration per current.
//!
//! Resampled property tables are memoised per datastore, keyed by
//! (property, size, temperature).

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::debug;
use nalgebra::DVector;

use crate::data::interpolate::{linspace, LinearInterpolator};
use crate::error::{DiffsimError, Result};
use crate::physics::{Direction, MaterialProperties};
use crate::search::Condition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Property {
    Diffusivity,
    Resistivity,
}

impl Property {
    fn label(&self) -> &'static str {
        match self {
            Property::Diffusivity => "Diffusivity",
            Property::Resistivity => "Resistivity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    property: Property,
    size: usize,
    temperature_bits: u64,
}

/// Measured profiles of one direction, keyed by truncated |current density|
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentTable {
    /// Positions [µm]
    pub x: Vec<f64>,

    /// (|current| in A/cm², concentrations), in file order
    pub columns: Vec<(u64, Vec<f64>)>,
}

impl ExperimentTable {
    /// Sorted current densities available in this table
    pub fn currents(&self) -> Vec<u64> {
        let mut currents: Vec<u64> = self.columns.iter().map(|(c, _)| *c).collect();
        currents.sort_unstable();
        currents
    }

    pub fn column(&self, current: u64) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(c, _)| *c == current)
            .map(|(_, values)| values.as_slice())
    }
}

/// Lookup key of a current density: magnitude truncated to whole A/cm²
pub fn current_key(current_density: f64) -> u64 {
    current_density.abs().trunc() as u64
}

/// Reader for a dataset directory
#[derive(Debug)]
pub struct InputDatastore {
    dir: PathBuf,
    prefix: String,
    cache: Mutex<HashMap<CacheKey, DVector<f64>>>,
}

impl InputDatastore {
    /// Opens a dataset directory; files are read on first use
    ///
    /// # Errors
    ///
    /// [`DiffsimError::MissingData`] when `dir` is not a directory.
    pub fn open(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            return Err(DiffsimError::MissingData(format!(
                "dataset directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            prefix: prefix.into(),
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn property_path(&self, property: Property, temperature: f64) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}K.csv", self.prefix, property.label(), temperature))
    }

    fn experiment_path(&self, direction: Direction, temperature: f64) -> PathBuf {
        self.dir.join(format!(
            "{}_Experimental_{}_{}K.csv",
            self.prefix,
            direction.label(),
            temperature
        ))
    }

    // ==================== Material properties ====================

    fn interpolated_property(&self, property: Property, size: usize, temperature: f64) -> Result<DVector<f64>> {
        if size == 0 {
            return Err(DiffsimError::EmptyInput("property sample count"));
        }
        let key = CacheKey {
            property,
            size,
            temperature_bits: temperature.to_bits(),
        };

        if let Some(hit) = self.cache.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(hit.clone());
        }

        debug!(
            "Resampling {} at {} K onto {} samples",
            property.label(),
            temperature,
            size
        );
        let path = self.property_path(property, temperature);
        let (c, values) = read_property_table(&path)?;
        let table = LinearInterpolator::new(c, values)?;
        let resampled = DVector::from_vec(table.resample(&linspace(0.0, 1.0, size)));

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, resampled.clone());
        Ok(resampled)
    }

    /// Diffusivity resampled uniformly over C ∈ [0, 1]
    pub fn interpolated_diffusivity(&self, size: usize, temperature: f64) -> Result<DVector<f64>> {
        self.interpolated_property(Property::Diffusivity, size, temperature)
    }

    /// Resistivity resampled uniformly over C ∈ [0, 1]
    pub fn interpolated_resistivity(&self, size: usize, temperature: f64) -> Result<DVector<f64>> {
        self.interpolated_property(Property::Resistivity, size, temperature)
    }

    /// Both resampled tables as solver input
    pub fn material(&self, size: usize, temperature: f64) -> Result<MaterialProperties> {
        MaterialProperties::new(
            self.interpolated_diffusivity(size, temperature)?,
            self.interpolated_resistivity(size, temperature)?,
        )
    }

    /// Number of memoised tables
    pub fn cached_tables(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    // ==================== Experiments ====================

    /// Parses the experimental file of one direction
    pub fn experiments(&self, direction: Direction, temperature: f64) -> Result<ExperimentTable> {
        read_experiment_table(&self.experiment_path(direction, temperature))
    }

    /// Experimental profile for `current_density` (A/cm²) resampled at `x` (µm)
    ///
    /// # Errors
    ///
    /// [`DiffsimError::MissingData`] when the file has no column for the
    /// truncated current magnitude.
    pub fn interpolated_experiment(
        &self,
        direction: Direction,
        current_density: f64,
        x: &[f64],
        temperature: f64,
    ) -> Result<DVector<f64>> {
        let table = self.experiments(direction, temperature)?;
        let key = current_key(current_density);
        let column = table.column(key).ok_or_else(|| {
            DiffsimError::MissingData(format!(
                "no {direction} experiment at {key} A/cm² and {temperature} K"
            ))
        })?;
        resample_column(&table.x, column, x)
    }

    /// Every experiment of one direction as a sweep condition, sorted by current
    pub fn experiment_conditions(&self, direction: Direction, x: &[f64], temperature: f64) -> Result<Vec<Condition>> {
        let table = self.experiments(direction, temperature)?;
        table
            .currents()
            .into_iter()
            .map(|current| {
                let column = table.column(current).ok_or_else(|| {
                    DiffsimError::MissingData(format!("experiment column {current} A/cm²"))
                })?;
                Ok(Condition::new(
                    current as f64,
                    direction,
                    resample_column(&table.x, column, x)?,
                ))
            })
            .collect()
    }
}

fn resample_column(positions: &[f64], column: &[f64], x: &[f64]) -> Result<DVector<f64>> {
    let profile = LinearInterpolator::new(positions.to_vec(), column.to_vec())?;
    Ok(DVector::from_vec(profile.resample(x)))
}

// =================================================================================================
// File Parsing
// =================================================================================================

/// Reads a two-column property table, skipping the header line
pub fn read_property_table(path: &Path) -> Result<(Vec<f64>, Vec<f64>)> {
    let text = fs::read_to_string(path).map_err(|e| missing_or_io(path, e))?;
    let mut c = Vec::new();
    let mut values = Vec::new();

    for (index, line) in text.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() < 2 {
            return Err(parse_error(path, index + 1, format!("expected 2 columns, found {}", fields.len())));
        }
        c.push(parse_field(path, index + 1, fields[0])?);
        values.push(parse_field(path, index + 1, fields[1])?);
    }

    if c.is_empty() {
        return Err(DiffsimError::MissingData(format!("{} holds no rows", path.display())));
    }
    Ok((c, values))
}

/// Reads an experimental table: currents in the first row, positions in the first column
pub fn read_experiment_table(path: &Path) -> Result<ExperimentTable> {
    let file = File::open(path).map_err(|e| missing_or_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = reader.records();
    let header = records
        .next()
        .ok_or_else(|| DiffsimError::MissingData(format!("{} is empty", path.display())))??;

    let mut columns: Vec<(u64, Vec<f64>)> = Vec::with_capacity(header.len().saturating_sub(1));
    for field in header.iter().skip(1) {
        columns.push((current_key(parse_field(path, 1, field)?), Vec::new()));
    }
    if columns.is_empty() {
        return Err(parse_error(path, 1, "no current columns".to_string()));
    }

    let mut x = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record?;
        let line = index + 2;
        let mut fields = record.iter();
        let position = fields
            .next()
            .ok_or_else(|| parse_error(path, line, "empty row".to_string()))?;
        x.push(parse_field(path, line, position)?);
        for (column, field) in columns.iter_mut().zip(fields) {
            column.1.push(parse_field(path, line, field)?);
        }
    }

    Ok(ExperimentTable { x, columns })
}

fn parse_field(path: &Path, line: usize, field: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|e| parse_error(path, line, format!("'{field}': {e}")))
}

fn parse_error(path: &Path, line: usize, message: String) -> DiffsimError {
    DiffsimError::Parse {
        path: path.display().to_string(),
        line,
        message,
    }
}

fn missing_or_io(path: &Path, error: std::io::Error) -> DiffsimError {
    if error.kind() == std::io::ErrorKind::NotFound {
        DiffsimError::MissingData(format!("{} not found", path.display()))
    } else {
        DiffsimError::Io(error)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    #[test]
    fn test_property_table_accepts_whitespace_and_commas() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "p.csv", "C D\n0.0 1e-14\n\n0.5,5e-14\n1.0\t1e-13\n");
        let (c, d) = read_property_table(&dir.path().join("p.csv")).unwrap();
        assert_eq!(c, vec![0.0, 0.5, 1.0]);
        assert_eq!(d, vec![1e-14, 5e-14, 1e-13]);
    }

    #[test]
    fn test_property_table_reports_bad_line() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "p.csv", "header\n0.0 1.0\n0.5 oops\n");
        match read_property_table(&dir.path().join("p.csv")).unwrap_err() {
            DiffsimError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_experiment_table_keys_by_truncated_magnitude() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "e.csv", "0,-1000,2500.8\n0.0,1.0,1.0\n12.5,0.5,0.4\n25.0,0.0,0.0\n");
        let table = read_experiment_table(&dir.path().join("e.csv")).unwrap();
        assert_eq!(table.x, vec![0.0, 12.5, 25.0]);
        assert_eq!(table.currents(), vec![1000, 2500]);
        assert_eq!(current_key(-999.9), 999);
        assert_eq!(current_key(2500.8), 2500);
        assert_eq!(table.column(2500), Some(&[1.0, 0.4, 0.0][..]));
        assert_eq!(table.column(3), None);
    }

    #[test]
    fn test_missing_file_is_missing_data() {
        let dir = TempDir::new().unwrap();
        let store = InputDatastore::open(dir.path(), "Ni").unwrap();
        assert!(matches!(
            store.interpolated_diffusivity(11, 973.0),
            Err(DiffsimError::MissingData(_))
        ));
        assert!(InputDatastore::open(dir.path().join("nope"), "Ni").is_err());
    }

    #[test]
    fn test_interpolated_experiment_resamples_columns() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "Ni_Experimental_reverse_973K.csv",
            "0,100\n0,1.0\n10,0.0\n",
        );
        let store = InputDatastore::open(dir.path(), "Ni").unwrap();
        let profile = store
            .interpolated_experiment(Direction::Reverse, -100.0, &[0.0, 2.5, 5.0], 973.0)
            .unwrap();
        assert_relative_eq!(profile[1], 0.75);
        assert_relative_eq!(profile[2], 0.5);

        assert!(matches!(
            store.interpolated_experiment(Direction::Reverse, 200.0, &[0.0], 973.0),
            Err(DiffsimError::MissingData(_))
        ));
    }
}
