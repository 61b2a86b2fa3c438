// claimsguard-core/src/domain/remediation/mod.rs

pub mod outcome;
pub mod plan;
pub mod policy;
pub mod strategies;

pub use outcome::{RemediationOutcome, StrategyId};
pub use plan::{GenderFields, Remediation, RemediationPlan};
pub use policy::RemediationPolicy;
