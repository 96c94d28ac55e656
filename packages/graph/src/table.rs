//! Processed reference table.
//!
//! The processed table is the flat view of the reference rows: one line per
//! item with its ID, type and title, followed by numbered columns. Columns
//! `1..=W` hold the fragment references (W is the widest fragment list),
//! columns `W+1..=W+M` the in-body mentions. Unused cells are empty.

use std::io::Write;
use std::path::Path;

use aiact_harvester::table::write_atomically;

use crate::error::Result;
use crate::expand::ReferenceRow;

/// Widths of the two groups of numbered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableLayout {
    pub fragment_columns: usize,
    pub mention_columns: usize,
}

impl TableLayout {
    /// Compute the layout that fits every row.
    #[must_use]
    pub fn for_rows(rows: &[ReferenceRow]) -> Self {
        rows.iter().fold(Self::default(), |layout, row| Self {
            fragment_columns: layout
                .fragment_columns
                .max(row.fragment_references().count()),
            mention_columns: layout.mention_columns.max(row.mentions().count()),
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.fragment_columns + self.mention_columns
    }

    /// Header line: `ID`, `Type`, `Title`, `1` .. `W+M`.
    #[must_use]
    pub fn header(&self) -> Vec<String> {
        ["ID", "Type", "Title"]
            .into_iter()
            .map(String::from)
            .chain((1..=self.width()).map(|column| column.to_string()))
            .collect()
    }

    /// Cells for one row, padded to the full width.
    #[must_use]
    pub fn record(&self, row: &ReferenceRow) -> Vec<String> {
        let mut record = vec![
            row.id.to_string(),
            row.item_type().to_string(),
            row.title.clone(),
        ];
        record.extend(pad(
            row.fragment_references().map(|r| r.target.to_string()),
            self.fragment_columns,
        ));
        record.extend(pad(
            row.mentions().map(|r| r.target.to_string()),
            self.mention_columns,
        ));
        record
    }
}

fn pad(cells: impl Iterator<Item = String>, width: usize) -> impl Iterator<Item = String> {
    cells.chain(std::iter::repeat(String::new())).take(width)
}

/// Write the processed table to any writer.
pub fn write_reference_table_to<W: Write>(writer: W, rows: &[ReferenceRow]) -> Result<()> {
    let layout = TableLayout::for_rows(rows);
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(layout.header())?;
    for row in rows {
        csv_writer.write_record(layout.record(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write the processed table to a file atomically.
pub fn write_reference_table(path: &Path, rows: &[ReferenceRow]) -> Result<()> {
    write_atomically(path, |file| write_reference_table_to(file, rows))?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "Wrote reference table");
    Ok(())
}
