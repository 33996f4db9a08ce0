//! Month and weekday filtering of trip tables.

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::formatting::title_case;
use bikeshare_core::models::{PeriodKind, TripRecord, TripTable, ALL_OPTION};
use tracing::debug;

/// Return a new table holding only the rows whose `kind` column matches
/// `requested`.
///
/// `requested` is case-insensitive; `"all"` or an empty string returns an
/// identical copy of `table`. A value outside `kind.valid_values()` yields
/// [`BikeshareError::InvalidPeriod`]. Row order is preserved and `table` is
/// left untouched.
pub fn filter_by_period(table: &TripTable, kind: PeriodKind, requested: &str) -> Result<TripTable> {
    match resolve_period(kind, requested)? {
        None => Ok(table.clone()),
        Some(wanted) => Ok(select_rows(table, kind, &wanted)),
    }
}

/// Owned variant of [`filter_by_period`] used on the load path, where the
/// unfiltered table is not needed afterwards.
pub fn narrow_by_period(table: TripTable, kind: PeriodKind, requested: &str) -> Result<TripTable> {
    match resolve_period(kind, requested)? {
        None => Ok(table),
        Some(wanted) => Ok(select_rows(&table, kind, &wanted)),
    }
}

/// Validate `requested` against the kind's valid values.
///
/// Returns `None` for "no filter" and otherwise the title-cased value as it
/// appears in the derived column.
pub fn resolve_period(kind: PeriodKind, requested: &str) -> Result<Option<String>> {
    let normalised = requested.trim().to_lowercase();
    if normalised.is_empty() || normalised == ALL_OPTION {
        return Ok(None);
    }

    if !kind.valid_values().contains(&normalised.as_str()) {
        return Err(BikeshareError::InvalidPeriod {
            kind,
            value: normalised,
        });
    }

    let wanted = title_case(&normalised);
    debug!("Filtering {} column on {:?}", kind.column(), wanted);
    Ok(Some(wanted))
}

fn select_rows(table: &TripTable, kind: PeriodKind, wanted: &str) -> TripTable {
    let column = kind.column();
    let rows: Vec<TripRecord> = table
        .rows()
        .iter()
        .filter(|row| row.text(column) == Some(wanted))
        .cloned()
        .collect();
    table.with_rows(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
