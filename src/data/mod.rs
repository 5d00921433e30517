/// Data layer: core types, loading, caching, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (dates, PM2.5 categories)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  (path, mtime + size) → Arc<Dataset>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  (year, station) → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  monthly means, category counts, scatter matrix, summaries
///   └──────────┘
/// ```

pub mod cache;
pub mod category;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
