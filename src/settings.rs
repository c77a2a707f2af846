use std::path::PathBuf;

use chrono::NaiveDate;
use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};

use crate::data::filter::{CategorySelection, DateRange, FilterState, ItemSelection};
use crate::data::loader::LoadOptions;
use crate::data::model::SalesTable;
use crate::state::{Controls, TOP_N_DEFAULT, TOP_N_MAX, TOP_N_MIN};

// ---------------------------------------------------------------------------
// Settings (CLI)
// ---------------------------------------------------------------------------

/// Coffee-shop sales dashboard: filter and summarise a sales spreadsheet
#[derive(Parser, Debug, Clone)]
#[command(name = "sales-dashboard", version)]
pub struct Settings {
    /// Sales file (.xlsx, .xls, .ods, .csv, .json or .parquet)
    #[arg(long, env = "SALES_DASHBOARD_DATA", default_value = "dataset_clean.xlsx")]
    pub data: PathBuf,

    /// Worksheet to read (first sheet if not given)
    #[arg(long)]
    pub sheet: Option<String>,

    /// First day to include, YYYY-MM-DD (defaults to the earliest date)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include, YYYY-MM-DD (defaults to the latest date)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only show this category ("Semua" shows every category)
    #[arg(long)]
    pub category: Option<String>,

    /// Only show these items (repeatable; every item if not given)
    #[arg(long = "item", conflicts_with = "no_items")]
    pub items: Vec<String>,

    /// Select no items at all
    #[arg(long)]
    pub no_items: bool,

    /// Number of items in the top-N breakdown
    #[arg(
        long,
        default_value_t = TOP_N_DEFAULT,
        value_parser = clap::value_parser!(u16).range(TOP_N_MIN as i64..=TOP_N_MAX as i64)
            .map(usize::from)
    )]
    pub top_n: usize,

    /// Print the values each control accepts instead of the dashboard
    #[arg(long)]
    pub list_options: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Settings {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
        }
    }

    /// Turn the command-line selections into dashboard controls.
    ///
    /// A missing date bound falls back to the table's own bound.
    pub fn controls(&self, table: &SalesTable) -> Controls {
        let full = DateRange::covering(table);
        let items = if self.no_items {
            ItemSelection::only(Vec::<String>::new())
        } else if self.items.is_empty() {
            ItemSelection::All
        } else {
            ItemSelection::only(self.items.iter().cloned())
        };
        Controls {
            filters: FilterState {
                date_range: DateRange::new(
                    self.from.unwrap_or(full.start),
                    self.to.unwrap_or(full.end),
                ),
                category: self
                    .category
                    .as_deref()
                    .map(CategorySelection::from_label)
                    .unwrap_or_default(),
                items,
            },
            top_n: self.top_n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SaleRecord;
    use clap::CommandFactory;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> SalesTable {
        let rec = |day| SaleRecord {
            date: Some(ymd(2024, 1, day)),
            category: "Coffee".into(),
            item_name: "Latte".into(),
            quantity: 1,
            total_sale_amount: 1.0,
            extras: Vec::new(),
        };
        SalesTable::from_records(vec![rec(1), rec(9)], Vec::new())
    }

    #[test]
    fn test_cli_definition() {
        Settings::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let s = Settings::try_parse_from(["sales-dashboard"]).unwrap();
        assert_eq!(s.top_n, 8);
        assert_eq!(s.format, OutputFormat::Text);
        let controls = s.controls(&table());
        assert_eq!(controls.filters.date_range, DateRange::new(ymd(2024, 1, 1), ymd(2024, 1, 9)));
        assert_eq!(controls.filters.category, CategorySelection::All);
        assert_eq!(controls.filters.items, ItemSelection::All);
    }

    #[test]
    fn test_explicit_selection() {
        let s = Settings::try_parse_from([
            "sales-dashboard",
            "--from",
            "2024-01-03",
            "--category",
            "Coffee",
            "--item",
            "Latte",
            "--item",
            "Mocha",
            "--top-n",
            "5",
            "--format",
            "json",
        ])
        .unwrap();
        let controls = s.controls(&table());
        assert_eq!(controls.filters.date_range, DateRange::new(ymd(2024, 1, 3), ymd(2024, 1, 9)));
        assert_eq!(controls.filters.category, CategorySelection::Only("Coffee".into()));
        assert_eq!(controls.filters.items, ItemSelection::only(["Latte", "Mocha"]));
        assert_eq!(controls.top_n, 5);
        assert_eq!(s.format, OutputFormat::Json);
    }

    #[test]
    fn test_no_items() {
        let s = Settings::try_parse_from(["sales-dashboard", "--no-items"]).unwrap();
        assert_eq!(
            s.controls(&table()).filters.items,
            ItemSelection::Only(Default::default())
        );
    }

    #[test]
    fn test_top_n_out_of_range_is_rejected() {
        assert!(Settings::try_parse_from(["sales-dashboard", "--top-n", "2"]).is_err());
        assert!(Settings::try_parse_from(["sales-dashboard", "--top-n", "21"]).is_err());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(Settings::try_parse_from(["sales-dashboard", "--from", "tomorrow"]).is_err());
    }

    #[test]
    fn test_list_options_flag() {
        assert!(!Settings::try_parse_from(["sales-dashboard"]).unwrap().list_options);
        let s = Settings::try_parse_from(["sales-dashboard", "--list-options", "--format", "json"])
            .unwrap();
        assert!(s.list_options);
        assert_eq!(s.format, OutputFormat::Json);
    }
}
