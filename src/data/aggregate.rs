use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{SaleRecord, SalesTable};

/// Column to group rows by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Category,
    Date,
    Item,
}

impl GroupKey {
    /// Group label of `record`; `None` for a missing date.
    fn label(self, record: &SaleRecord) -> Option<String> {
        match self {
            GroupKey::Category => Some(record.category.clone()),
            GroupKey::Item => Some(record.item_name.clone()),
            GroupKey::Date => record.date.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// Numeric column to sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    TotalSaleAmount,
    Quantity,
}

impl Measure {
    fn value(self, record: &SaleRecord) -> f64 {
        match self {
            Measure::TotalSaleAmount => record.total_sale_amount,
            Measure::Quantity => record.quantity as f64,
        }
    }
}

/// One summary row: a group label and its summed measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// Sum `measure` per distinct `group_key`.
///
/// Rows without a date are left out of date groupings. Groups come back in
/// ascending key order (ISO dates therefore sort chronologically).
pub fn aggregate_sum(table: &SalesTable, group_key: GroupKey, measure: Measure) -> Vec<GroupTotal> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for rec in &table.records {
        if let Some(key) = group_key.label(rec) {
            *sums.entry(key).or_default() += measure.value(rec);
        }
    }
    sums.into_iter()
        .map(|(key, total)| GroupTotal { key, total })
        .collect()
}

/// Keep the `n` rows with the largest `by`, highest first.
///
/// The sort is stable, so ties keep their incoming relative order.
pub fn top_n<T, F>(mut rows: Vec<T>, n: usize, by: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    rows.sort_by(|a, b| by(b).partial_cmp(&by(a)).unwrap_or(Ordering::Equal));
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: Option<NaiveDate>, category: &str, item: &str, qty: u64, total: f64) -> SaleRecord {
        SaleRecord {
            date,
            category: category.to_string(),
            item_name: item.to_string(),
            quantity: qty,
            total_sale_amount: total,
            extras: Vec::new(),
        }
    }

    fn total(key: &str, total: f64) -> GroupTotal {
        GroupTotal {
            key: key.to_string(),
            total,
        }
    }

    #[test]
    fn test_sum_per_category() {
        let table = SalesTable::from_records(
            vec![
                record(Some(ymd(2024, 1, 1)), "Coffee", "Latte", 2, 50_000.0),
                record(Some(ymd(2024, 1, 1)), "Food", "Croissant", 1, 25_000.0),
            ],
            Vec::new(),
        );
        let sums = aggregate_sum(&table, GroupKey::Category, Measure::TotalSaleAmount);
        assert_eq!(sums, vec![total("Coffee", 50_000.0), total("Food", 25_000.0)]);
    }

    #[test]
    fn test_sum_per_date_skips_missing_dates() {
        let table = SalesTable::from_records(
            vec![
                record(Some(ymd(2024, 1, 2)), "Coffee", "Latte", 1, 10.0),
                record(Some(ymd(2024, 1, 1)), "Coffee", "Latte", 1, 5.0),
                record(None, "Coffee", "Latte", 1, 100.0),
                record(Some(ymd(2024, 1, 2)), "Food", "Bagel", 1, 7.5),
            ],
            Vec::new(),
        );
        let sums = aggregate_sum(&table, GroupKey::Date, Measure::TotalSaleAmount);
        assert_eq!(
            sums,
            vec![total("2024-01-01", 5.0), total("2024-01-02", 17.5)]
        );
    }

    #[test]
    fn test_sum_quantity_per_item() {
        let table = SalesTable::from_records(
            vec![
                record(None, "Coffee", "Latte", 2, 0.0),
                record(None, "Coffee", "Latte", 3, 0.0),
                record(None, "Food", "Bagel", 1, 0.0),
            ],
            Vec::new(),
        );
        let sums = aggregate_sum(&table, GroupKey::Item, Measure::Quantity);
        assert_eq!(sums, vec![total("Bagel", 1.0), total("Latte", 5.0)]);
    }

    #[test]
    fn test_empty_table_has_no_groups() {
        let sums = aggregate_sum(&SalesTable::default(), GroupKey::Category, Measure::TotalSaleAmount);
        assert!(sums.is_empty());
    }

    #[test]
    fn test_top_n_with_fewer_rows_than_n() {
        let rows = vec![total("a", 1.0), total("b", 3.0), total("c", 2.0)];
        let top = top_n(rows, 8, |r| r.total);
        let keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["b", "c", "a"]);
    }

    #[test]
    fn test_top_n_truncates() {
        let rows = vec![total("a", 1.0), total("b", 3.0), total("c", 2.0), total("d", 4.0)];
        let top = top_n(rows, 2, |r| r.total);
        assert_eq!(top, vec![total("d", 4.0), total("b", 3.0)]);
    }

    #[test]
    fn test_top_n_ties_keep_input_order() {
        let rows = vec![
            total("x", 5.0),
            total("y", 9.0),
            total("z", 5.0),
            total("w", 5.0),
        ];
        let top = top_n(rows, 3, |r| r.total);
        let keys: Vec<&str> = top.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, ["y", "x", "z"]);
    }

    #[test]
    fn test_top_zero() {
        assert!(top_n(vec![total("a", 1.0)], 0, |r| r.total).is_empty());
    }
}
