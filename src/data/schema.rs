use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Canonical columns
// ---------------------------------------------------------------------------

/// The five columns every sales file must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Category,
    ItemName,
    Quantity,
    TotalSaleAmount,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::Category,
        Column::ItemName,
        Column::Quantity,
        Column::TotalSaleAmount,
    ];

    /// Header used by the source spreadsheet.
    pub fn canonical_name(self) -> &'static str {
        match self {
            Column::Date => "Tanggal",
            Column::Category => "Kategori",
            Column::ItemName => "Nama_Item",
            Column::Quantity => "Jumlah",
            Column::TotalSaleAmount => "Total_Penjualan",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("dataset has no header row")]
    NoHeader,
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),
}

// ---------------------------------------------------------------------------
// Header resolution
// ---------------------------------------------------------------------------

/// Positions of the canonical columns within a source header row, plus the
/// remaining (extra) columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    positions: [usize; 5],
    /// `(position, trimmed header)` of every non-canonical column.
    pub extras: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Source position of a canonical column.
    pub fn position(&self, column: Column) -> usize {
        self.positions[column as usize]
    }
}

/// Map raw headers onto the canonical columns.
///
/// Headers are whitespace-trimmed first. An exact match wins; otherwise a
/// case-insensitive match is taken, and among several such headers the last
/// one is used.
pub fn resolve_columns(headers: &[String]) -> Result<ColumnMap, SchemaError> {
    if headers.is_empty() {
        return Err(SchemaError::NoHeader);
    }
    let trimmed: Vec<&str> = headers.iter().map(|h| h.trim()).collect();

    let mut positions = [usize::MAX; 5];
    let mut missing = Vec::new();
    for column in Column::ALL {
        let name = column.canonical_name();
        let exact = trimmed.iter().position(|h| *h == name);
        let loose = || {
            trimmed
                .iter()
                .rposition(|h| h.to_lowercase() == name.to_lowercase())
        };
        match exact.or_else(loose) {
            Some(pos) => positions[column as usize] = pos,
            None => missing.push(name),
        }
    }
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns(missing));
    }

    let extras = trimmed
        .iter()
        .enumerate()
        .filter(|(i, _)| !positions.contains(i))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    Ok(ColumnMap { positions, extras })
}
