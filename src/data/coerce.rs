//! Per-column type coercion. None of these functions fail: values that cannot
//! be read fall back to a null date, a zero, or the unknown label.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{RawCell, UNKNOWN_LABEL};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Read a calendar date. Bare numbers are not treated as dates.
pub fn to_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Date(d) => Some(*d),
        RawCell::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local().date())
}

/// Read a number; `None` when the cell is not numeric.
fn to_number(cell: &RawCell) -> Option<f64> {
    let v = match cell {
        RawCell::Int(i) => *i as f64,
        RawCell::Float(f) => *f,
        RawCell::Bool(b) => f64::from(u8::from(*b)),
        RawCell::Text(s) => s.trim().parse::<f64>().ok()?,
        RawCell::Empty | RawCell::Date(_) => return None,
    };
    v.is_finite().then_some(v)
}

/// Quantity sold: truncated toward zero, never negative.
pub fn to_quantity(cell: &RawCell) -> u64 {
    match cell {
        RawCell::Int(i) => u64::try_from(*i).unwrap_or(0),
        other => to_number(other)
            .filter(|v| *v > 0.0)
            .map(|v| v.trunc() as u64)
            .unwrap_or(0),
    }
}

/// Sale amount, never negative.
pub fn to_amount(cell: &RawCell) -> f64 {
    to_number(cell).filter(|v| *v > 0.0).unwrap_or(0.0)
}

/// Text label with blanks replaced by [`UNKNOWN_LABEL`].
pub fn to_label(cell: &RawCell) -> String {
    if cell.is_blank() {
        UNKNOWN_LABEL.to_string()
    } else {
        cell.to_string()
    }
}

/// Whether coercing `cell` into its column lost information.
///
/// Used only to report how much of a file was recovered.
pub fn is_lossy_date(cell: &RawCell) -> bool {
    !cell.is_blank() && to_date(cell).is_none()
}

/// See [`is_lossy_date`].
pub fn is_lossy_number(cell: &RawCell) -> bool {
    !cell.is_blank() && to_number(cell).map_or(true, |v| v < 0.0)
}
