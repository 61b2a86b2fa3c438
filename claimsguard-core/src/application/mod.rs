// claimsguard-core/src/application/mod.rs

pub mod pipeline;
pub mod validation;
pub mod workflow;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Lets the CLI write `use claimsguard_core::application::{run_validation, RunSettings};`

pub use pipeline::{CANCELLED_MESSAGE, RunSettings, ValidationRun, ValidationServices, run_validation};
pub use validation::{DatasetValidator, classify, evaluate_rules};
pub use workflow::{
    RetryPolicy, StageDecision, StageStatus, WorkflowState, WorkflowStatus, run_validation_stage,
};
