// claimsguard-core/src/ports/mod.rs

// Contracts the application layer depends on. Adapters live in `infrastructure`.

pub mod dataset_store;
pub mod progress;
pub mod report;

pub use dataset_store::DatasetStore;
pub use progress::{ProgressLevel, ProgressSink};
pub use report::ReportPublisher;
