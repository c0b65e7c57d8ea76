/// Data layer: core types, loading, header resolution and export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Workbook (header-less RawSheets)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  header   │  HeaderSpec → unique column names → Table
///   └──────────┘
///        │
///        ▼   (crate::filter selects rows)
///   ┌──────────┐
///   │  export   │  Table → .xlsx / .csv bytes
///   └──────────┘
/// ```

pub mod export;
pub mod header;
pub mod loader;
pub mod model;
