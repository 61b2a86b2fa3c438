// claimsguard/src/commands/mod.rs

pub mod report;
pub mod rules;
pub mod validate;
