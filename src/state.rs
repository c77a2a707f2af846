use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::data::filter::{
    filter, CategorySelection, DateRange, FilterState, ItemSelection, ALL_CATEGORIES_LABEL,
};
use crate::data::model::SalesTable;
use crate::view::DashboardView;

/// Smallest selectable top-N item count.
pub const TOP_N_MIN: usize = 3;
/// Largest selectable top-N item count.
pub const TOP_N_MAX: usize = 20;
pub const TOP_N_DEFAULT: usize = 8;

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Everything the user can set on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub filters: FilterState,
    /// Number of items in the top-N breakdown, within `TOP_N_MIN..=TOP_N_MAX`.
    pub top_n: usize,
}

impl Controls {
    /// Full date range, every category and item, default top-N.
    pub fn defaults(table: &SalesTable) -> Self {
        Controls {
            filters: FilterState::select_all(table),
            top_n: TOP_N_DEFAULT,
        }
    }
}

/// Choices offered to the presentation layer for each control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlOptions {
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
    /// The "all" entry followed by the sorted categories.
    pub categories: Vec<String>,
    pub items: Vec<String>,
    pub top_n_min: usize,
    pub top_n_max: usize,
    pub top_n_default: usize,
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// One user's dashboard session, independent of rendering.
///
/// Every change re-filters from the shared base table; filters never stack
/// on a previous result.
pub struct DashboardState {
    /// Loaded dataset, shared read-only between sessions.
    pub dataset: Arc<SalesTable>,

    pub controls: Controls,

    /// Rows passing the current controls (cached).
    pub filtered: SalesTable,
}

impl DashboardState {
    /// Start a session with default controls.
    pub fn new(dataset: Arc<SalesTable>) -> Self {
        let controls = Controls::defaults(&dataset);
        let filtered = filter(&dataset, &controls.filters);
        DashboardState {
            dataset,
            controls,
            filtered,
        }
    }

    pub fn options(&self) -> ControlOptions {
        let categories = std::iter::once(ALL_CATEGORIES_LABEL.to_string())
            .chain(self.dataset.categories.iter().cloned())
            .collect();
        ControlOptions {
            date_bounds: self.dataset.date_bounds(),
            categories,
            items: self.dataset.items.iter().cloned().collect(),
            top_n_min: TOP_N_MIN,
            top_n_max: TOP_N_MAX,
            top_n_default: TOP_N_DEFAULT,
        }
    }

    /// Replace every control at once.
    pub fn apply(&mut self, controls: Controls) {
        self.controls = Controls {
            top_n: controls.top_n.clamp(TOP_N_MIN, TOP_N_MAX),
            ..controls
        };
        self.refilter();
    }

    /// Recompute `filtered` after a filter change.
    pub fn refilter(&mut self) {
        self.filtered = filter(&self.dataset, &self.controls.filters);
        log::debug!(
            "{} of {} rows pass the current filters",
            self.filtered.len(),
            self.dataset.len()
        );
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.controls.filters.date_range = range;
        self.refilter();
    }

    pub fn set_category(&mut self, category: CategorySelection) {
        self.controls.filters.category = category;
        self.refilter();
    }

    /// Toggle a single item in the item selection.
    pub fn toggle_item(&mut self, item: &str) {
        if self.controls.filters.items == ItemSelection::All {
            self.controls.filters.items = ItemSelection::Only(self.dataset.items.clone());
        }
        if let ItemSelection::Only(selected) = &mut self.controls.filters.items {
            if !selected.remove(item) {
                selected.insert(item.to_string());
            }
        }
        self.refilter();
    }

    /// Select every item.
    pub fn select_all_items(&mut self) {
        self.controls.filters.items = ItemSelection::All;
        self.refilter();
    }

    /// Deselect every item; nothing passes until an item is picked again.
    pub fn select_no_items(&mut self) {
        self.controls.filters.items = ItemSelection::Only(BTreeSet::new());
        self.refilter();
    }

    /// Set the top-N count, clamped to the allowed range.
    pub fn set_top_n(&mut self, n: usize) {
        self.controls.top_n = n.clamp(TOP_N_MIN, TOP_N_MAX);
    }

    /// Every output of the dashboard for the current controls.
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.filtered, self.controls.top_n)
    }
}
