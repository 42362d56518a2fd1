/// Data layer: core types, loading, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet  (file or http)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset, bad cells → None
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, per-column null counts
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  yearly gross totals, top directors by score
///   └───────────┘
/// ```

pub mod aggregate;
pub mod loader;
pub mod model;
