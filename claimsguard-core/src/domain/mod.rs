// claimsguard-core/src/domain/mod.rs

pub mod dataset;
pub mod error;
pub mod project;
pub mod remediation;
pub mod report;
pub mod validation;

pub use error::DomainError;
