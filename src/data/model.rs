use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Placeholder stored for a missing category or item name.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Text values read as missing, the same set pandas treats as NA by default.
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// RawCell – a single cell as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, before any column coercion.
///
/// Every file format converts into this type so that coercion only has to
/// be written once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Text(s) => write!(f, "{s}"),
            RawCell::Int(i) => write!(f, "{i}"),
            // Whole floats keep their ".0" so "3.0" and "3" stay distinct labels.
            RawCell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            RawCell::Float(v) => write!(f, "{v}"),
            RawCell::Bool(b) => write!(f, "{b}"),
            RawCell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl RawCell {
    /// Whether the cell carries no usable value: empty, whitespace-only,
    /// one of [`NA_TOKENS`], or a NaN float.
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => {
                let s = s.trim();
                s.is_empty() || NA_TOKENS.contains(&s)
            }
            RawCell::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// SaleRecord – one row of the sales table
// ---------------------------------------------------------------------------

/// One transaction line after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    /// `None` when the source value could not be read as a date.
    pub date: Option<NaiveDate>,
    pub category: String,
    pub item_name: String,
    pub quantity: u64,
    pub total_sale_amount: f64,
    /// Values of the non-canonical columns, aligned with
    /// [`SalesTable::extra_columns`].
    #[serde(skip)]
    pub extras: Vec<RawCell>,
}

// ---------------------------------------------------------------------------
// SalesTable – the loaded (or filtered) dataset
// ---------------------------------------------------------------------------

/// An immutable table of sale records with pre-computed label indices.
///
/// Filtering never mutates a table; it builds a new one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesTable {
    /// All records, in source order.
    pub records: Vec<SaleRecord>,
    /// Names of source columns other than the five canonical ones.
    pub extra_columns: Vec<String>,
    /// Sorted unique categories.
    pub categories: BTreeSet<String>,
    /// Sorted unique item names.
    pub items: BTreeSet<String>,
}

impl SalesTable {
    /// Build label indices from the records.
    pub fn from_records(records: Vec<SaleRecord>, extra_columns: Vec<String>) -> Self {
        let mut categories = BTreeSet::new();
        let mut items = BTreeSet::new();
        for rec in &records {
            categories.insert(rec.category.clone());
            items.insert(rec.item_name.clone());
        }
        SalesTable {
            records,
            extra_columns,
            categories,
            items,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest non-null dates, if any row has a date.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Keep the records accepted by `keep`, preserving order.
    pub fn retain_where<F>(&self, mut keep: F) -> SalesTable
    where
        F: FnMut(&SaleRecord) -> bool,
    {
        let records = self.records.iter().filter(|r| keep(r)).cloned().collect();
        SalesTable::from_records(records, self.extra_columns.clone())
    }
}
