use serde::Serialize;

use crate::data::aggregate::{aggregate_sum, top_n, GroupKey, GroupTotal, Measure};
use crate::data::histogram::{histogram, HistogramBin};
use crate::data::model::SalesTable;
use crate::format::DisplayTable;

/// Number of bins in the sale-amount distribution.
pub const HISTOGRAM_BINS: usize = 20;

/// One point of the quantity-vs-amount relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub quantity: u64,
    pub total_sale_amount: f64,
    pub category: String,
    pub item_name: String,
}

/// Everything the presentation layer shows for one set of controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub row_count: usize,
    /// Requested size of `top_items`.
    pub top_n: usize,
    /// Total amount per category.
    pub category_totals: Vec<GroupTotal>,
    /// Total amount per day, oldest first.
    pub daily_totals: Vec<GroupTotal>,
    /// Best-selling items by total amount, highest first.
    pub top_items: Vec<GroupTotal>,
    pub scatter: Vec<ScatterPoint>,
    pub histogram: Vec<HistogramBin>,
    pub display: DisplayTable,
}

impl DashboardView {
    /// Compute every summary of an already filtered table.
    pub fn build(filtered: &SalesTable, top_count: usize) -> Self {
        let per_item = aggregate_sum(filtered, GroupKey::Item, Measure::TotalSaleAmount);
        let amounts: Vec<f64> = filtered
            .records
            .iter()
            .map(|r| r.total_sale_amount)
            .collect();

        DashboardView {
            row_count: filtered.len(),
            top_n: top_count,
            category_totals: aggregate_sum(filtered, GroupKey::Category, Measure::TotalSaleAmount),
            daily_totals: aggregate_sum(filtered, GroupKey::Date, Measure::TotalSaleAmount),
            top_items: top_n(per_item, top_count, |g| g.total),
            scatter: filtered
                .records
                .iter()
                .map(|r| ScatterPoint {
                    quantity: r.quantity,
                    total_sale_amount: r.total_sale_amount,
                    category: r.category.clone(),
                    item_name: r.item_name.clone(),
                })
                .collect(),
            histogram: histogram(&amounts, HISTOGRAM_BINS),
            display: DisplayTable::from_table(filtered),
        }
    }
}
