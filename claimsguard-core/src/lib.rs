// claimsguard-core/src/lib.rs

// 1. Documentation
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (traits the application depends on)
// Dataset store, report publisher, progress sink.
pub mod ports;

// 2. Domain
// Tables, rules, remediation strategies, reports.
// Depends on nothing outside itself.
pub mod domain;

// 3. Infrastructure (adapters)
// DuckDB CSV store, JSON reports, YAML configuration, tracing progress.
pub mod infrastructure;

// 4. Application (use cases)
// Per-dataset validation, concurrent runs, workflow stage with retries.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::ClaimsGuardError;
