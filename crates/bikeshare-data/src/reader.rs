//! CSV loading for the per-city trip files.
//!
//! Reads a city's trips into a [`TripTable`], parsing the two timestamp
//! columns, deriving Month, Day Name and Trip, and then narrowing the table
//! by the requested month and day.

use std::io::Read;
use std::path::{Path, PathBuf};

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::{City, Column, PeriodKind, TripFields, TripRecord, TripTable};
use bikeshare_core::settings::city_file_in;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use crate::filter::narrow_by_period;

/// Timestamp layouts accepted in the Start Time and End Time columns.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Headers that mark a leading, unlabeled row-index column.
const INDEX_HEADERS: &[&str] = &["", "Unnamed: 0"];

// ── TripLoader ────────────────────────────────────────────────────────────────

/// Resolves city names to CSV files under a data directory and loads them.
#[derive(Debug, Clone)]
pub struct TripLoader {
    data_dir: PathBuf,
}

impl TripLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Resolve `city_name` (case-insensitive) to its CSV path.
    pub fn resolve(&self, city_name: &str) -> Result<PathBuf> {
        let city = City::from_name(city_name)?;
        Ok(city_file_in(&self.data_dir, city))
    }

    /// Load a city's trips and keep only those matching `month` and `day`.
    ///
    /// `"all"` (or an empty string) disables the corresponding filter.
    pub fn load(&self, city_name: &str, month: &str, day: &str) -> Result<TripTable> {
        let path = self.resolve(city_name)?;
        let table = read_trip_file(&path)?;
        let loaded = table.len();

        let table = narrow_by_period(table, PeriodKind::Month, month)?;
        let table = narrow_by_period(table, PeriodKind::Day, day)?;

        debug!(
            "Loaded {} trips for {} ({} after month={:?}, day={:?})",
            loaded,
            city_name,
            table.len(),
            month,
            day
        );
        Ok(table)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read a trip CSV file from disk.
///
/// A missing file yields [`BikeshareError::FileNotFound`] carrying `path`.
pub fn read_trip_file(path: &Path) -> Result<TripTable> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => BikeshareError::FileNotFound(path.to_path_buf()),
        _ => BikeshareError::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    debug!("Reading trips from {}", path.display());
    read_trips(std::io::BufReader::new(file))
}

/// Read trips from any CSV source.
///
/// Start Time and End Time must be present. A leading unlabeled index
/// column is dropped, as is any column the table does not model.
pub fn read_trips<R: Read>(source: R) -> Result<TripTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let indexed = has_index_column(&headers);
    let columns = source_columns(&headers)?;

    let mut rows: Vec<TripRecord> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawTrip = record.deserialize(Some(&headers))?;
        let row_id = if indexed {
            record.get(0).and_then(|value| value.parse::<u64>().ok())
        } else {
            None
        };
        rows.push(raw.into_record(line, row_id)?);
    }

    debug!("Parsed {} trip rows with columns {:?}", rows.len(), columns);
    Ok(TripTable::new(columns, rows))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One CSV row as written on disk. Optional columns default to `None` when
/// the file does not carry them.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<f64>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

impl RawTrip {
    fn into_record(self, line: u64, row_id: Option<u64>) -> Result<TripRecord> {
        let start_time = parse_timestamp(&self.start_time, Column::StartTime, line)?;
        let end_time = self
            .end_time
            .as_deref()
            .map(|value| parse_timestamp(value, Column::EndTime, line))
            .transpose()?;

        let fields = TripFields {
            row_id,
            end_time,
            trip_duration: self.trip_duration,
            start_station: self.start_station,
            end_station: self.end_station,
            user_type: self.user_type,
            gender: self.gender,
            birth_year: self.birth_year,
        };
        Ok(TripRecord::new(start_time, fields))
    }
}

fn has_index_column(headers: &csv::StringRecord) -> bool {
    headers
        .get(0)
        .is_some_and(|header| INDEX_HEADERS.contains(&header))
}

/// Map the header row to the modelled source columns, failing when a
/// required column is absent.
fn source_columns(headers: &csv::StringRecord) -> Result<Vec<Column>> {
    let mut columns: Vec<Column> = Vec::new();
    let skip = usize::from(has_index_column(headers));
    if skip > 0 {
        debug!("Dropping leading row-index column");
    }
    for header in headers.iter().skip(skip) {
        match Column::from_header(header) {
            Some(column) => columns.push(column),
            None => debug!("Ignoring unmodelled column {:?}", header),
        }
    }

    let missing: Vec<String> = Column::REQUIRED
        .into_iter()
        .filter(|c| !columns.contains(c))
        .map(|c| c.header().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(BikeshareError::MissingColumns(missing));
    }

    Ok(columns)
}

/// Parse a naive local timestamp in any of [`TIMESTAMP_FORMATS`].
fn parse_timestamp(value: &str, column: Column, line: u64) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| BikeshareError::TimestampParse {
            line,
            column,
            value: value.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
