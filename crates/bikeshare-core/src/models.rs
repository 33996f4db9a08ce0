use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::error::{BikeshareError, Result};

/// Value that disables a month or day filter.
pub const ALL_OPTION: &str = "all";

/// Months covered by the trip data sets, lower-case.
pub const VALID_MONTHS: &[&str] = &["january", "february", "march", "april", "may", "june"];

/// Full weekday names, lower-case, Monday first.
pub const VALID_DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Label used in the Trip column when a start station is absent.
pub const NO_START_STATION: &str = "No Start Station";

/// Label used in the Trip column when an end station is absent.
pub const NO_END_STATION: &str = "No End Station";

// ── City ──────────────────────────────────────────────────────────────────────

/// A city with a bike-share data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Every supported city, in menu order.
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    /// Lower-case display name, as typed by users.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    /// Name of the CSV file holding this city's trips.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Resolve a city from its name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| BikeshareError::InvalidCity(name.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

/// Every column a trip table can carry, source and derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
    Month,
    DayName,
    Trip,
}

impl Column {
    /// Columns that may appear in a source file, in canonical order.
    pub const SOURCE: [Column; 8] = [
        Column::StartTime,
        Column::EndTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
        Column::UserType,
        Column::Gender,
        Column::BirthYear,
    ];

    /// Columns computed at load time.
    pub const DERIVED: [Column; 3] = [Column::Month, Column::DayName, Column::Trip];

    /// Columns without which a file cannot be loaded.
    pub const REQUIRED: [Column; 2] = [Column::StartTime, Column::EndTime];

    /// Header text used in the CSV files.
    pub fn header(self) -> &'static str {
        match self {
            Column::StartTime => "Start Time",
            Column::EndTime => "End Time",
            Column::TripDuration => "Trip Duration",
            Column::StartStation => "Start Station",
            Column::EndStation => "End Station",
            Column::UserType => "User Type",
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
            Column::Month => "Month",
            Column::DayName => "Day Name",
            Column::Trip => "Trip",
        }
    }

    /// Map a CSV header to a source column. Derived column names are not
    /// accepted here because they are always recomputed.
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::SOURCE.into_iter().find(|c| c.header() == header)
    }

    pub fn is_derived(self) -> bool {
        Column::DERIVED.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ── PeriodKind ────────────────────────────────────────────────────────────────

/// The two calendar periods a table can be narrowed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Month,
    Day,
}

impl PeriodKind {
    /// Derived column compared against the requested value.
    pub fn column(self) -> Column {
        match self {
            PeriodKind::Month => Column::Month,
            PeriodKind::Day => Column::DayName,
        }
    }

    /// Accepted filter values, lower-case.
    pub fn valid_values(self) -> &'static [&'static str] {
        match self {
            PeriodKind::Month => VALID_MONTHS,
            PeriodKind::Day => VALID_DAYS,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Month => f.write_str("month"),
            PeriodKind::Day => f.write_str("day"),
        }
    }
}

// ── TripRecord ────────────────────────────────────────────────────────────────

/// One bike trip, with its derived columns already filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    /// Value of the file's leading row-index column, when it had one.
    pub row_id: Option<u64>,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Trip length in seconds.
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<f64>,
    /// Full month name of `start_time`, e.g. `"March"`.
    pub month: String,
    /// Full weekday name of `start_time`, e.g. `"Tuesday"`.
    pub day_name: String,
    /// `"{start} to {end}"` label.
    pub trip: String,
}

/// Source fields of a trip before the derived columns are computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFields {
    pub row_id: Option<u64>,
    pub end_time: Option<NaiveDateTime>,
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<f64>,
}

impl TripRecord {
    /// Build a record and derive Month, Day Name and Trip from its fields.
    pub fn new(start_time: NaiveDateTime, fields: TripFields) -> Self {
        let trip = trip_label(fields.start_station.as_deref(), fields.end_station.as_deref());
        Self {
            row_id: fields.row_id,
            start_time,
            end_time: fields.end_time,
            trip_duration: fields.trip_duration,
            start_station: fields.start_station,
            end_station: fields.end_station,
            user_type: fields.user_type,
            gender: fields.gender,
            birth_year: fields.birth_year,
            month: start_time.format("%B").to_string(),
            day_name: start_time.format("%A").to_string(),
            trip,
        }
    }

    /// Hour of day (0-23) the trip started.
    pub fn start_hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Value of a text column, or `None` for missing and non-text columns.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::StartStation => self.start_station.as_deref(),
            Column::EndStation => self.end_station.as_deref(),
            Column::UserType => self.user_type.as_deref(),
            Column::Gender => self.gender.as_deref(),
            Column::Month => Some(&self.month),
            Column::DayName => Some(&self.day_name),
            Column::Trip => Some(&self.trip),
            _ => None,
        }
    }

    /// Render any column for display. Missing values render as `NaN`.
    pub fn display_value(&self, column: Column) -> String {
        const MISSING: &str = "NaN";
        let timestamp = |ts: &NaiveDateTime| ts.format("%Y-%m-%d %H:%M:%S").to_string();
        match column {
            Column::StartTime => timestamp(&self.start_time),
            Column::EndTime => self
                .end_time
                .as_ref()
                .map(timestamp)
                .unwrap_or_else(|| MISSING.to_string()),
            Column::TripDuration => self
                .trip_duration
                .map(|d| d.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            Column::BirthYear => self
                .birth_year
                .map(|y| format!("{:.1}", y))
                .unwrap_or_else(|| MISSING.to_string()),
            other => self.text(other).unwrap_or(MISSING).to_string(),
        }
    }
}

/// Build the composite Trip label, substituting sentinels for absent names.
pub fn trip_label(start_station: Option<&str>, end_station: Option<&str>) -> String {
    format!(
        "{} to {}",
        start_station.unwrap_or(NO_START_STATION),
        end_station.unwrap_or(NO_END_STATION)
    )
}

// ── TripTable ─────────────────────────────────────────────────────────────────

/// An ordered, read-only collection of trips plus the set of columns the
/// source provided.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    columns: Vec<Column>,
    rows: Vec<TripRecord>,
}

impl TripTable {
    /// Build a table from the source columns that were present and the rows
    /// read from them. Derived columns are always appended.
    pub fn new(source_columns: impl IntoIterator<Item = Column>, rows: Vec<TripRecord>) -> Self {
        let mut columns: Vec<Column> = Vec::new();
        for column in source_columns {
            if !column.is_derived() && !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns.sort();
        columns.extend(Column::DERIVED);
        Self { columns, rows }
    }

    /// A table with the same columns holding only `rows`.
    pub fn with_rows(&self, rows: Vec<TripRecord>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[TripRecord] {
        &self.rows
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
