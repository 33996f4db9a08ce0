//! The four statistics routines and the reports they produce.
//!
//! Each routine has a typed `*_stats` function returning its figures or a
//! [`StatsError`], and a report handler that renders those figures (or the
//! error) as text. Handlers never fail: every error is caught and written
//! into the report so that one routine cannot abort another.

use std::fmt;
use std::time::{Duration, Instant};

use bikeshare_core::error::StatsError;
use bikeshare_core::formatting::{format_duration, rule};
use bikeshare_core::models::{Column, TripRecord, TripTable};
use tracing::debug;

use crate::aggregator::FrequencyTable;

// ── Operations ────────────────────────────────────────────────────────────────

/// A statistics routine that can be run against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOperation {
    TimeStats,
    StationStats,
    TripDurationStats,
    UserStats,
}

type Handler = fn(&TripTable, &mut StatsReport);

/// Display text and handler for one operation.
struct OperationEntry {
    label: &'static str,
    heading: &'static str,
    handler: Handler,
}

/// Indexed by `StatsOperation as usize`.
const OPERATIONS: [OperationEntry; 4] = [
    OperationEntry {
        label: "Time Stats",
        heading: "Calculating the Most Frequent Times of Travel...",
        handler: time_report,
    },
    OperationEntry {
        label: "Station Stats",
        heading: "Calculating the Most Popular Stations and Trip...",
        handler: station_report,
    },
    OperationEntry {
        label: "Trip Duration Stats",
        heading: "Calculating Trip Duration...",
        handler: duration_report,
    },
    OperationEntry {
        label: "User Stats",
        heading: "Calculating Users Stats...",
        handler: user_report,
    },
];

impl StatsOperation {
    /// Every operation, in menu order.
    pub const ALL: [StatsOperation; 4] = [
        StatsOperation::TimeStats,
        StatsOperation::StationStats,
        StatsOperation::TripDurationStats,
        StatsOperation::UserStats,
    ];

    fn entry(self) -> &'static OperationEntry {
        &OPERATIONS[self as usize]
    }

    /// Menu label, e.g. `"Time Stats"`.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    /// First line of the report.
    pub fn heading(self) -> &'static str {
        self.entry().heading
    }

    /// Run the routine and time it. Never fails; see [`StatsReport::errors`].
    pub fn run(self, table: &TripTable) -> StatsReport {
        let started = Instant::now();
        let mut report = StatsReport::new(self);
        (self.entry().handler)(table, &mut report);
        report.elapsed = started.elapsed();
        debug!(
            "{} finished in {:?} with {} error(s)",
            self.label(),
            report.elapsed,
            report.errors.len()
        );
        report
    }
}

impl fmt::Display for StatsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Run every routine in menu order.
pub fn run_all(table: &TripTable) -> Vec<StatsReport> {
    StatsOperation::ALL.into_iter().map(|op| op.run(table)).collect()
}

// ── StatsReport ───────────────────────────────────────────────────────────────

/// Rendered output of one routine.
#[derive(Debug, Clone)]
pub struct StatsReport {
    operation: StatsOperation,
    lines: Vec<String>,
    errors: Vec<String>,
    elapsed: Duration,
}

impl StatsReport {
    fn new(operation: StatsOperation) -> Self {
        Self {
            operation,
            lines: Vec::new(),
            errors: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Record a caught error; it is also shown in the body.
    fn error(&mut self, text: String) {
        self.lines.push(text.clone());
        self.errors.push(text);
    }

    pub fn operation(&self) -> StatsOperation {
        self.operation
    }

    /// Body lines, in display order, including error messages.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Messages of every error caught while computing this report.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Wall-clock time the routine took.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.operation.heading())?;
        writeln!(f, "{}", rule('-'))?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "This took {} seconds to run.",
            self.elapsed.as_secs_f64()
        )?;
        write!(f, "{}", rule('='))
    }
}

// ── Time stats ────────────────────────────────────────────────────────────────

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: String,
    pub day_name: String,
    /// Hour of day, 0-23.
    pub start_hour: u32,
}

pub fn time_stats(table: &TripTable) -> Result<TimeStats, StatsError> {
    ensure_not_empty(table)?;
    let start_hour = FrequencyTable::from_values(table.rows().iter().map(TripRecord::start_hour))
        .mode()
        .copied()
        .ok_or(StatsError::NoValues(Column::StartTime))?;

    Ok(TimeStats {
        month: most_common_text(table, Column::Month)?,
        day_name: most_common_text(table, Column::DayName)?,
        start_hour,
    })
}

fn time_report(table: &TripTable, report: &mut StatsReport) {
    match time_stats(table) {
        Ok(stats) => {
            report.line(format!("The most common month is {}.", stats.month));
            report.line(format!("The most common day of week is {}.", stats.day_name));
            report.line(format!("The most common start hour is {}.", stats.start_hour));
        }
        Err(e) => report.error(format!("Error calculating time stats: {}", e)),
    }
}

// ── Station stats ─────────────────────────────────────────────────────────────

/// Most popular stations and station pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    pub trip: String,
}

pub fn station_stats(table: &TripTable) -> Result<StationStats, StatsError> {
    ensure_not_empty(table)?;
    Ok(StationStats {
        start_station: most_common_text(table, Column::StartStation)?,
        end_station: most_common_text(table, Column::EndStation)?,
        trip: most_common_text(table, Column::Trip)?,
    })
}

fn station_report(table: &TripTable, report: &mut StatsReport) {
    match station_stats(table) {
        Ok(stats) => {
            report.line(format!(
                "The most commonly used start station is {}.",
                stats.start_station
            ));
            report.line(format!(
                "The most commonly used end station is {}.",
                stats.end_station
            ));
            report.line(format!("The most frequent trip is {}.", stats.trip));
        }
        Err(e) => report.error(format!("Error calculating station stats: {}", e)),
    }
}

// ── Trip duration stats ───────────────────────────────────────────────────────

/// Total and mean trip duration, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

pub fn duration_stats(table: &TripTable) -> Result<DurationStats, StatsError> {
    ensure_not_empty(table)?;
    require_column(table, Column::TripDuration)?;

    // NaN and infinite cells count as missing.
    let durations: Vec<f64> = table
        .rows()
        .iter()
        .filter_map(|r| r.trip_duration)
        .filter(|d| d.is_finite())
        .collect();
    if durations.is_empty() {
        return Err(StatsError::NoValues(Column::TripDuration));
    }

    let total_seconds: f64 = durations.iter().sum();
    if !total_seconds.is_finite() || total_seconds < 0.0 {
        return Err(StatsError::OutOfRange(Column::TripDuration));
    }
    Ok(DurationStats {
        total_seconds,
        mean_seconds: total_seconds / durations.len() as f64,
    })
}

fn duration_report(table: &TripTable, report: &mut StatsReport) {
    let formatted = duration_stats(table).and_then(|stats| {
        match (
            format_duration(stats.total_seconds),
            format_duration(stats.mean_seconds),
        ) {
            (Some(total), Some(mean)) => Ok((total, mean)),
            _ => Err(StatsError::OutOfRange(Column::TripDuration)),
        }
    });
    match formatted {
        Ok((total, mean)) => {
            report.line(format!("The total travel time is {}.", total));
            report.line(format!("The mean travel time is {}.", mean));
        }
        Err(e) => report.error(format!("Error calculating trip duration stats: {}", e)),
    }
}

// ── User stats ────────────────────────────────────────────────────────────────

/// Birth year extremes and mode, ignoring missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i64,
    pub most_recent: i64,
    pub most_common: i64,
}

/// Rider demographics. A field is `None` when the city's data set does not
/// carry the corresponding column.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub user_types: Option<Vec<(String, usize)>>,
    pub genders: Option<Vec<(String, usize)>>,
    /// Computed independently; a failure here leaves the counts intact.
    pub birth_years: Option<Result<BirthYearStats, StatsError>>,
}

pub fn user_stats(table: &TripTable) -> Result<UserStats, StatsError> {
    ensure_not_empty(table)?;
    Ok(UserStats {
        user_types: table
            .has_column(Column::UserType)
            .then(|| value_counts(table, Column::UserType)),
        genders: table
            .has_column(Column::Gender)
            .then(|| value_counts(table, Column::Gender)),
        birth_years: table
            .has_column(Column::BirthYear)
            .then(|| birth_year_stats(table)),
    })
}

pub fn birth_year_stats(table: &TripTable) -> Result<BirthYearStats, StatsError> {
    require_column(table, Column::BirthYear)?;
    let years = FrequencyTable::from_values(
        table
            .rows()
            .iter()
            .filter_map(|r| r.birth_year)
            .filter(|y| y.is_finite())
            .map(|y| y as i64),
    );

    match (years.min(), years.max(), years.mode()) {
        (Some(&earliest), Some(&most_recent), Some(&most_common)) => Ok(BirthYearStats {
            earliest,
            most_recent,
            most_common,
        }),
        _ => Err(StatsError::NoValues(Column::BirthYear)),
    }
}

fn user_report(table: &TripTable, report: &mut StatsReport) {
    let stats = match user_stats(table) {
        Ok(stats) => stats,
        Err(e) => {
            report.error(format!("Error calculating user stats: {}", e));
            return;
        }
    };

    if let Some(counts) = &stats.user_types {
        report.line("User Counts:");
        push_counts(report, counts);
        report.line("");
    }
    if let Some(counts) = &stats.genders {
        report.line("Gender Counts:");
        push_counts(report, counts);
        report.line("");
    }
    match stats.birth_years {
        Some(Ok(years)) => {
            report.line(format!("Earliest birth year: {}", years.earliest));
            report.line(format!("Most recent birth year: {}", years.most_recent));
            report.line(format!("Most common birth year: {}", years.most_common));
        }
        Some(Err(e)) => {
            report.error(format!("Error processing birth years: {}", e));
            report.line("Birth year data may contain invalid values.");
        }
        None => {}
    }
}

/// One aligned `value  count` line per distinct value.
fn push_counts(report: &mut StatsReport, counts: &[(String, usize)]) {
    if counts.is_empty() {
        report.line("(no values)");
        return;
    }
    let width = counts.iter().map(|(v, _)| v.chars().count()).max().unwrap_or(0);
    for (value, count) in counts {
        report.line(format!("{:<width$}  {}", value, count, width = width));
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

fn ensure_not_empty(table: &TripTable) -> Result<(), StatsError> {
    if table.is_empty() {
        Err(StatsError::EmptyTable)
    } else {
        Ok(())
    }
}

fn require_column(table: &TripTable, column: Column) -> Result<(), StatsError> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(StatsError::MissingColumn(column))
    }
}

fn most_common_text(table: &TripTable, column: Column) -> Result<String, StatsError> {
    require_column(table, column)?;
    FrequencyTable::from_values(table.rows().iter().filter_map(|r| r.text(column)))
        .mode()
        .map(|value| value.to_string())
        .ok_or(StatsError::NoValues(column))
}

/// Distinct non-missing values with counts, most common first.
fn value_counts(table: &TripTable, column: Column) -> Vec<(String, usize)> {
    FrequencyTable::from_values(table.rows().iter().filter_map(|r| r.text(column)))
        .ranked()
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
