//! Page-by-page rendering of raw trip rows.

use bikeshare_core::models::{Column, TripTable};

/// Walks a table a fixed number of rows at a time.
#[derive(Debug)]
pub struct RawDataPager<'a> {
    table: &'a TripTable,
    position: usize,
    page_size: usize,
}

impl<'a> RawDataPager<'a> {
    /// Create a pager over `table`. A `page_size` of zero is treated as one.
    pub fn new(table: &'a TripTable, page_size: usize) -> Self {
        Self {
            table,
            position: 0,
            page_size: page_size.max(1),
        }
    }

    /// Render the next page, or `None` once every row has been shown.
    pub fn next_page(&mut self) -> Option<String> {
        if !self.has_more() {
            return None;
        }
        let end = (self.position + self.page_size).min(self.table.len());
        let page = render_rows(self.table, self.position, end);
        self.position = end;
        Some(page)
    }

    pub fn has_more(&self) -> bool {
        self.position < self.table.len()
    }

    /// Index of the next row to be shown.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Render rows `start..end` of `table` as a right-aligned text grid.
///
/// The first column holds each row's id from the source file, or its
/// position in `table` when the file had no index column.
pub fn render_rows(table: &TripTable, start: usize, end: usize) -> String {
    let columns: &[Column] = table.columns();
    let rows = &table.rows()[start..end];

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    let mut header = vec![String::new()];
    header.extend(columns.iter().map(|c| c.header().to_string()));
    grid.push(header);
    for (offset, row) in rows.iter().enumerate() {
        let id = row.row_id.unwrap_or((start + offset) as u64);
        let mut cells = vec![id.to_string()];
        cells.extend(columns.iter().map(|&c| row.display_value(c)));
        grid.push(cells);
    }

    let mut widths = vec![0usize; columns.len() + 1];
    for cells in &grid {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    grid.iter()
        .map(|cells| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{:>width$}", cell, width = width))
                .collect::<Vec<String>>()
                .join("  ")
        })
        .collect::<Vec<String>>()
        .join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
