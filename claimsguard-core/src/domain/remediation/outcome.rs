// claimsguard-core/src/domain/remediation/outcome.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::validation::outcome::{Details, RuleId};

/// Identifiers of the correction strategies, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyId {
    #[serde(rename = "fix_date_formats")]
    DateFormats,
    #[serde(rename = "fix_duplicates")]
    Duplicates,
    #[serde(rename = "fix_negative_amounts")]
    NegativeAmounts,
    #[serde(rename = "fix_future_dates")]
    FutureDates,
    #[serde(rename = "fix_gender_mismatch")]
    GenderMismatch,
}

impl StrategyId {
    pub const ORDERED: [StrategyId; 5] = [
        StrategyId::DateFormats,
        StrategyId::Duplicates,
        StrategyId::NegativeAmounts,
        StrategyId::FutureDates,
        StrategyId::GenderMismatch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateFormats => "fix_date_formats",
            Self::Duplicates => "fix_duplicates",
            Self::NegativeAmounts => "fix_negative_amounts",
            Self::FutureDates => "fix_future_dates",
            Self::GenderMismatch => "fix_gender_mismatch",
        }
    }

    /// The rule whose failure this strategy repairs. Date normalization only
    /// prepares the data for later strategies and resolves nothing by itself.
    pub fn resolves(&self) -> Option<RuleId> {
        match self {
            Self::DateFormats => None,
            Self::Duplicates => Some(RuleId::Duplicates),
            Self::NegativeAmounts => Some(RuleId::CostAmounts),
            Self::FutureDates => Some(RuleId::DateLogic),
            Self::GenderMismatch => Some(RuleId::GenderDiagnosis),
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What one strategy did (or declined to do) to one field or table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationOutcome {
    pub strategy_name: StrategyId,
    pub success: bool,
    pub records_fixed: usize,
    pub message: String,
    #[serde(default)]
    pub details: Details,
}

impl RemediationOutcome {
    pub fn fixed(strategy: StrategyId, records_fixed: usize, message: impl Into<String>) -> Self {
        Self {
            strategy_name: strategy,
            success: true,
            records_fixed,
            message: message.into(),
            details: Details::new(),
        }
    }

    /// The strategy refused to act; nothing was changed.
    pub fn declined(strategy: StrategyId, message: impl Into<String>) -> Self {
        Self {
            strategy_name: strategy,
            success: false,
            records_fixed: 0,
            message: message.into(),
            details: Details::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Whether this outcome repaired rows flagged by `rule`.
    pub fn repairs(&self, rule: RuleId) -> bool {
        self.success && self.records_fixed > 0 && self.strategy_name.resolves() == Some(rule)
    }
}
