/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawGrid (headers + RawCell rows)
///   └──────────┘
///        │  schema: resolve headers   coerce: fix types, fill blanks
///        ▼
///   ┌────────────┐
///   │ SalesTable │  Vec<SaleRecord>, category / item index
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range ∧ category ∧ items → new SalesTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────────┐
///   │ aggregate / histogram │  group-by-sum, top-N, amount bins
///   └───────────────────────┘
/// ```

pub mod aggregate;
pub mod coerce;
pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod schema;
