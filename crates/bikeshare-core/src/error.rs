use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Column, PeriodKind};

/// All errors produced while loading and filtering trip data.
#[derive(Error, Debug)]
pub enum BikeshareError {
    /// The requested city is not one of the supported cities.
    #[error("Invalid city name: {0}")]
    InvalidCity(String),

    /// A month or day filter value is not in the list of valid values.
    #[error("Invalid {kind}: {value}")]
    InvalidPeriod { kind: PeriodKind, value: String },

    /// The data file resolved for a city does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A file exists but could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more columns every trip file must carry are absent.
    #[error("Required column(s) missing in the CSV file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The CSV reader rejected the input.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A timestamp cell did not match any recognised format.
    #[error("Invalid timestamp in column '{column}' on line {line}: {value:?}")]
    TimestampParse {
        line: u64,
        column: Column,
        value: String,
    },
}

/// Convenience alias used throughout the bikeshare crates.
pub type Result<T> = std::result::Result<T, BikeshareError>;

/// Failures inside a single statistics routine.
///
/// These never leave the routine that raised them; they are rendered into
/// that routine's report instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The table holds no rows at all.
    #[error("no trip records match the selected filters")]
    EmptyTable,

    /// The column is not part of this city's data set.
    #[error("column '{0}' is not available for this city")]
    MissingColumn(Column),

    /// The column exists but every value in it is missing.
    #[error("column '{0}' has no values")]
    NoValues(Column),

    /// The column's values add up to something that cannot be shown, such
    /// as a negative or overflowing total.
    #[error("column '{0}' totals to an out-of-range value")]
    OutOfRange(Column),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_city() {
        let err = BikeshareError::InvalidCity("boston".to_string());
        assert_eq!(err.to_string(), "Invalid city name: boston");
    }

    #[test]
    fn test_error_display_invalid_period() {
        let err = BikeshareError::InvalidPeriod {
            kind: PeriodKind::Month,
            value: "marchx".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid month: marchx");

        let err = BikeshareError::InvalidPeriod {
            kind: PeriodKind::Day,
            value: "funday".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid day: funday");
    }

    #[test]
    fn test_error_display_file_not_found() {
        let err = BikeshareError::FileNotFound(PathBuf::from("./data/chicago.csv"));
        assert_eq!(err.to_string(), "File not found: ./data/chicago.csv");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = BikeshareError::FileRead {
            path: PathBuf::from("/data/washington.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/washington.csv"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_missing_columns() {
        let err = BikeshareError::MissingColumns(vec![
            "Start Time".to_string(),
            "End Time".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Required column(s) missing in the CSV file: Start Time, End Time"
        );
    }

    #[test]
    fn test_error_display_timestamp_parse() {
        let err = BikeshareError::TimestampParse {
            line: 3,
            column: Column::StartTime,
            value: "yesterday".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp in column 'Start Time' on line 3: \"yesterday\""
        );
    }

    #[test]
    fn test_stats_error_display() {
        assert_eq!(
            StatsError::MissingColumn(Column::Gender).to_string(),
            "column 'Gender' is not available for this city"
        );
        assert_eq!(
            StatsError::NoValues(Column::BirthYear).to_string(),
            "column 'Birth Year' has no values"
        );
        assert_eq!(
            StatsError::EmptyTable.to_string(),
            "no trip records match the selected filters"
        );
        assert_eq!(
            StatsError::OutOfRange(Column::TripDuration).to_string(),
            "column 'Trip Duration' totals to an out-of-range value"
        );
    }
}
