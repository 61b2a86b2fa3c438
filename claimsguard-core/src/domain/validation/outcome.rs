// claimsguard-core/src/domain/validation/outcome.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::dataset::share;

/// Free-form structured details attached to outcomes (ordered for stable JSON).
pub type Details = BTreeMap<String, serde_json::Value>;

// Ascending order (Info < Warning < Critical) lets escalation use `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Completeness,
    Range,
    Logic,
    Consistency,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Range => "range",
            Self::Logic => "logic",
            Self::Consistency => "consistency",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable identifier of each check in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    RequiredFields,
    NullValues,
    VolumeConsistency,
    Duplicates,
    AgeRange,
    CostAmounts,
    DateLogic,
    GenderDiagnosis,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredFields => "required_fields",
            Self::NullValues => "null_values",
            Self::VolumeConsistency => "volume_consistency",
            Self::Duplicates => "duplicates",
            Self::AgeRange => "age_range",
            Self::CostAmounts => "cost_amounts",
            Self::DateLogic => "date_logic",
            Self::GenderDiagnosis => "gender_diagnosis",
        }
    }

    pub fn category(&self) -> RuleCategory {
        match self {
            Self::RequiredFields | Self::NullValues => RuleCategory::Completeness,
            Self::VolumeConsistency | Self::Duplicates => RuleCategory::Consistency,
            Self::AgeRange | Self::CostAmounts => RuleCategory::Range,
            Self::DateLogic | Self::GenderDiagnosis => RuleCategory::Logic,
        }
    }

    /// Severity before any share-based escalation.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::RequiredFields | Self::AgeRange | Self::DateLogic | Self::GenderDiagnosis => {
                Severity::Critical
            }
            Self::NullValues
            | Self::VolumeConsistency
            | Self::Duplicates
            | Self::CostAmounts => Severity::Warning,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict of one rule against one dataset.
///
/// Built once per evaluation; the orchestrator only ever derives a copy with
/// `fix_applied` set via [`ValidationOutcome::with_fix_applied`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub rule_name: RuleId,
    pub category: RuleCategory,
    pub severity: Severity,
    pub passed: bool,
    pub message: String,
    pub affected_records: usize,
    pub total_records: usize,
    pub affected_percentage: f64,
    #[serde(default)]
    pub details: Details,
    pub auto_fixable: bool,
    pub fix_applied: bool,
}

impl ValidationOutcome {
    /// A passing verdict at the rule's default severity.
    pub fn pass(rule: RuleId, message: impl Into<String>, total_records: usize) -> Self {
        Self {
            rule_name: rule,
            category: rule.category(),
            severity: rule.default_severity(),
            passed: true,
            message: message.into(),
            affected_records: 0,
            total_records,
            affected_percentage: 0.0,
            details: Details::new(),
            auto_fixable: false,
            fix_applied: false,
        }
    }

    /// A passing verdict for a check that could not apply to this table's schema.
    pub fn skipped(rule: RuleId, message: impl Into<String>, total_records: usize) -> Self {
        Self {
            severity: Severity::Info,
            ..Self::pass(rule, message, total_records)
        }
    }

    /// A failing verdict. `affected_records` is clamped to `total_records`.
    pub fn fail(
        rule: RuleId,
        severity: Severity,
        message: impl Into<String>,
        affected_records: usize,
        total_records: usize,
    ) -> Self {
        let affected_records = affected_records.min(total_records);
        Self {
            rule_name: rule,
            category: rule.category(),
            severity,
            passed: false,
            message: message.into(),
            affected_records,
            total_records,
            affected_percentage: share(affected_records, total_records) * 100.0,
            details: Details::new(),
            auto_fixable: false,
            fix_applied: false,
        }
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn with_auto_fixable(mut self, auto_fixable: bool) -> Self {
        self.auto_fixable = auto_fixable && !self.passed;
        self
    }

    pub fn with_fix_applied(mut self, fix_applied: bool) -> Self {
        self.fix_applied = fix_applied;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
    }

    #[test]
    fn test_pass_has_zero_affected_share() {
        let o = ValidationOutcome::pass(RuleId::Duplicates, "ok", 10);
        assert!(o.passed);
        assert_eq!(o.affected_percentage, 0.0);
        assert_eq!(o.severity, Severity::Warning);
        assert_eq!(o.category, RuleCategory::Consistency);
    }

    #[test]
    fn test_fail_computes_share_and_clamps() {
        let o = ValidationOutcome::fail(RuleId::NullValues, Severity::Warning, "x", 25, 100);
        assert_eq!(o.affected_percentage, 25.0);

        let clamped = ValidationOutcome::fail(RuleId::NullValues, Severity::Warning, "x", 500, 100);
        assert_eq!(clamped.affected_records, 100);
        assert_eq!(clamped.affected_percentage, 100.0);

        let empty = ValidationOutcome::fail(RuleId::RequiredFields, Severity::Critical, "x", 0, 0);
        assert_eq!(empty.affected_percentage, 0.0);
    }

    #[test]
    fn test_passing_outcomes_are_never_auto_fixable() {
        let o = ValidationOutcome::pass(RuleId::Duplicates, "ok", 10).with_auto_fixable(true);
        assert!(!o.auto_fixable);
    }

    #[test]
    fn test_serialized_shape() -> anyhow::Result<()> {
        let o = ValidationOutcome::fail(RuleId::DateLogic, Severity::Critical, "bad", 1, 4)
            .with_detail("future_service_dates", 1);
        let json = serde_json::to_value(&o)?;
        assert_eq!(json["rule_name"], "date_logic");
        assert_eq!(json["category"], "logic");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["affected_percentage"], 25.0);
        assert_eq!(json["details"]["future_service_dates"], 1);
        assert_eq!(json["fix_applied"], false);
        Ok(())
    }
}
