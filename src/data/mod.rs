/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet / https://
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → LaunchDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset │  Vec<LaunchRecord>, site index, payload bounds
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site + payload window → matching records
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
