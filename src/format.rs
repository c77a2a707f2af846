//! Text formatting for the display table.

use serde::Serialize;

use crate::data::model::{SaleRecord, SalesTable};
use crate::data::schema::Column;

/// Format an amount as a rounded integer with comma thousands separators,
/// e.g. `1234567.6` → `"1,234,568"`.
///
/// ```
/// use sales_dashboard::format::format_thousands;
///
/// assert_eq!(format_thousands(50000.0), "50,000");
/// assert_eq!(format_thousands(999.4), "999");
/// ```
pub fn format_thousands(amount: f64) -> String {
    let rounded = format!("{:.0}", amount.abs());
    let grouped = group_thousands(&rounded);
    if amount < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let lead = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == lead {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ---------------------------------------------------------------------------
// Display table
// ---------------------------------------------------------------------------

/// Rows of the filtered table rendered as text, ready to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DisplayTable {
    /// Canonical columns first, then any extra source columns.
    pub fn from_table(table: &SalesTable) -> Self {
        let columns = Column::ALL
            .iter()
            .map(|c| c.canonical_name().to_string())
            .chain(table.extra_columns.iter().cloned())
            .collect();
        let rows = table.records.iter().map(display_row).collect();
        DisplayTable { columns, rows }
    }
}

fn display_row(rec: &SaleRecord) -> Vec<String> {
    let mut row = vec![
        rec.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        rec.category.clone(),
        rec.item_name.clone(),
        rec.quantity.to_string(),
        format_thousands(rec.total_sale_amount),
    ];
    row.extend(rec.extras.iter().map(ToString::to_string));
    row
}
