// claimsguard-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod progress;

pub use adapters::{DuckDbDatasetStore, InMemoryDatasetStore, JsonReportPublisher};
pub use progress::{RecordingProgress, TracingProgress};
