use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{SaleRecord, SalesTable};

/// Selector label meaning "every category". Matched exactly, so a real
/// category called "All" stays selectable.
pub const ALL_CATEGORIES_LABEL: &str = "Semua";

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Inclusive calendar-date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Bounds covering every date in `table`, or the widest possible range
    /// when the table has no dates at all.
    pub fn covering(table: &SalesTable) -> Self {
        let (start, end) = table
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        DateRange { start, end }
    }

    /// A missing date never matches.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| self.start <= d && d <= self.end)
    }
}

/// Category selector: everything, or one exact category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum CategorySelection {
    #[default]
    All,
    Only(String),
}

impl CategorySelection {
    /// Parse a selector label; [`ALL_CATEGORIES_LABEL`] selects every category.
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed == ALL_CATEGORIES_LABEL {
            CategorySelection::All
        } else {
            CategorySelection::Only(trimmed.to_string())
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategorySelection::All => true,
            CategorySelection::Only(c) => c == category,
        }
    }
}

/// Item selector: everything, or a set of item names.
///
/// An explicitly empty set selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum ItemSelection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl ItemSelection {
    pub fn only<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemSelection::Only(items.into_iter().map(Into::into).collect())
    }

    fn matches(&self, item: &str) -> bool {
        match self {
            ItemSelection::All => true,
            ItemSelection::Only(set) => set.contains(item),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// All active predicates; they combine with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub date_range: DateRange,
    pub category: CategorySelection,
    pub items: ItemSelection,
}

impl FilterState {
    /// Initialise a [`FilterState`] that keeps every dated row of `table`.
    pub fn select_all(table: &SalesTable) -> Self {
        FilterState {
            date_range: DateRange::covering(table),
            category: CategorySelection::All,
            items: ItemSelection::All,
        }
    }

    pub fn matches(&self, record: &SaleRecord) -> bool {
        self.date_range.contains(record.date)
            && self.category.matches(&record.category)
            && self.items.matches(&record.item_name)
    }
}

/// Rows of `table` passing every predicate, in original order.
pub fn filter(table: &SalesTable, filters: &FilterState) -> SalesTable {
    table.retain_where(|rec| filters.matches(rec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: Option<NaiveDate>, category: &str, item: &str, total: f64) -> SaleRecord {
        SaleRecord {
            date,
            category: category.to_string(),
            item_name: item.to_string(),
            quantity: 1,
            total_sale_amount: total,
            extras: Vec::new(),
        }
    }

    fn sample() -> SalesTable {
        SalesTable::from_records(
            vec![
                record(Some(ymd(2024, 1, 1)), "Coffee", "Latte", 50_000.0),
                record(Some(ymd(2024, 1, 2)), "Food", "Croissant", 25_000.0),
                record(None, "Coffee", "Latte", 10_000.0),
                record(Some(ymd(2024, 1, 3)), "Coffee", "Espresso", 20_000.0),
                record(Some(ymd(2024, 1, 4)), "Coffee", "Mocha", 30_000.0),
            ],
            Vec::new(),
        )
    }

    fn items(table: &SalesTable) -> Vec<&str> {
        table.records.iter().map(|r| r.item_name.as_str()).collect()
    }

    #[test]
    fn test_full_range_excludes_null_dates() {
        let table = sample();
        let out = filter(&table, &FilterState::select_all(&table));
        assert_eq!(out.len(), 4);
        assert!(out.records.iter().all(|r| r.date.is_some()));
        assert_eq!(items(&out), ["Latte", "Croissant", "Espresso", "Mocha"]);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let table = sample();
        let mut state = FilterState::select_all(&table);
        state.date_range = DateRange::new(ymd(2024, 1, 2), ymd(2024, 1, 3));
        assert_eq!(items(&filter(&table, &state)), ["Croissant", "Espresso"]);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let table = sample();
        let mut state = FilterState::select_all(&table);
        state.date_range = DateRange::new(ymd(2024, 1, 3), ymd(2024, 1, 1));
        assert!(filter(&table, &state).is_empty());
    }

    #[test]
    fn test_category_filter() {
        let table = sample();
        let mut state = FilterState::select_all(&table);
        state.category = CategorySelection::from_label("Food");
        assert_eq!(items(&filter(&table, &state)), ["Croissant"]);
    }

    #[test]
    fn test_all_categories_label() {
        assert_eq!(CategorySelection::from_label("Semua"), CategorySelection::All);
        assert_eq!(CategorySelection::from_label(" Semua "), CategorySelection::All);
        assert_eq!(
            CategorySelection::from_label("Coffee"),
            CategorySelection::Only("Coffee".into())
        );
    }

    #[test]
    fn test_category_named_all_is_selectable() {
        let table = SalesTable::from_records(
            vec![
                record(Some(ymd(2024, 1, 1)), "All", "Combo", 10.0),
                record(Some(ymd(2024, 1, 1)), "Coffee", "Latte", 20.0),
            ],
            Vec::new(),
        );
        let mut state = FilterState::select_all(&table);
        state.category = CategorySelection::from_label("All");
        assert_eq!(state.category, CategorySelection::Only("All".into()));
        assert_eq!(items(&filter(&table, &state)), ["Combo"]);
    }

    #[test]
    fn test_empty_item_set_selects_nothing() {
        let table = sample();
        let mut state = FilterState::select_all(&table);
        state.items = ItemSelection::Only(BTreeSet::new());
        assert!(filter(&table, &state).is_empty());
    }

    #[test]
    fn test_predicates_commute() {
        let table = sample();
        let base = FilterState::select_all(&table);

        let by_category = FilterState {
            category: CategorySelection::Only("Coffee".into()),
            ..base.clone()
        };
        let by_items = FilterState {
            items: ItemSelection::only(["Latte", "Croissant", "Mocha"]),
            ..base.clone()
        };

        let cat_then_items = filter(&filter(&table, &by_category), &by_items);
        let items_then_cat = filter(&filter(&table, &by_items), &by_category);
        let combined = filter(
            &table,
            &FilterState {
                category: by_category.category.clone(),
                items: by_items.items.clone(),
                ..base
            },
        );

        assert_eq!(cat_then_items, items_then_cat);
        assert_eq!(cat_then_items, combined);
        assert_eq!(items(&combined), ["Latte", "Mocha"]);
    }

    #[test]
    fn test_filter_leaves_base_table_untouched() {
        let table = sample();
        let before = table.clone();
        let mut state = FilterState::select_all(&table);
        state.category = CategorySelection::Only("Food".into());
        let _ = filter(&table, &state);
        assert_eq!(table, before);
    }

    #[test]
    fn test_empty_table() {
        let table = SalesTable::default();
        let state = FilterState::select_all(&table);
        assert!(filter(&table, &state).is_empty());
    }
}
