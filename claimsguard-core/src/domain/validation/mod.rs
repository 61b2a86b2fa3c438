// claimsguard-core/src/domain/validation/mod.rs

pub mod catalog;
pub mod configuration;
pub mod outcome;
pub mod rules;

pub use catalog::RuleCatalog;
pub use configuration::ValidationConfig;
pub use outcome::{Details, RuleCategory, RuleId, Severity, ValidationOutcome};
pub use rules::Rule;
