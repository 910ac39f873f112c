/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, column index (shared read-only)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  quality == q → FilteredRows
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
