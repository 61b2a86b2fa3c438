// claimsguard-core/src/infrastructure/adapters/mod.rs

pub mod duckdb;
pub mod memory;
pub mod report;

pub use self::duckdb::DuckDbDatasetStore;
pub use memory::InMemoryDatasetStore;
pub use report::{JsonReportPublisher, load_report};
