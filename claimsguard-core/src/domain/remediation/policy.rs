// claimsguard-core/src/domain/remediation/policy.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::dataset::share;

pub const DEFAULT_MAX_DUPLICATE_SHARE: f64 = 0.05;
pub const DEFAULT_MAX_NEGATIVE_SHARE: f64 = 0.01;
pub const DEFAULT_MIN_YEAR_TYPO_SHARE: f64 = 0.80;
pub const DEFAULT_MAX_GENDER_FIXES: usize = 10;
pub const DEFAULT_MIN_DATE_PARSE_SHARE: f64 = 0.95;

/// Safe-to-autofix thresholds, one per defect class.
///
/// Rules consult the policy to flag outcomes as auto-fixable and strategies consult
/// the very same values before touching a row, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RemediationPolicy {
    /// Duplicate rows (repeat occurrences) over total rows.
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_duplicate_share: f64,

    /// Negative values over total rows, per amount field.
    #[validate(range(min = 0.0, max = 1.0))]
    pub max_negative_share: f64,

    /// Year-typo signature rows over future-dated rows.
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_year_typo_share: f64,

    /// Absolute cap on gender corrections.
    pub max_gender_fixes: usize,

    /// Best-format parse success over total rows.
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_date_parse_share: f64,
}

impl Default for RemediationPolicy {
    fn default() -> Self {
        Self {
            max_duplicate_share: DEFAULT_MAX_DUPLICATE_SHARE,
            max_negative_share: DEFAULT_MAX_NEGATIVE_SHARE,
            min_year_typo_share: DEFAULT_MIN_YEAR_TYPO_SHARE,
            max_gender_fixes: DEFAULT_MAX_GENDER_FIXES,
            min_date_parse_share: DEFAULT_MIN_DATE_PARSE_SHARE,
        }
    }
}

impl RemediationPolicy {
    pub fn duplicates_fixable(&self, duplicates: usize, total: usize) -> bool {
        duplicates > 0 && share(duplicates, total) <= self.max_duplicate_share
    }

    pub fn negatives_fixable(&self, negatives: usize, total: usize) -> bool {
        negatives > 0 && share(negatives, total) <= self.max_negative_share
    }

    pub fn year_typo_matches(&self, typo_rows: usize, future_rows: usize) -> bool {
        future_rows > 0 && share(typo_rows, future_rows) >= self.min_year_typo_share
    }

    pub fn gender_fixable(&self, mismatches: usize) -> bool {
        mismatches > 0 && mismatches <= self.max_gender_fixes
    }

    pub fn date_format_accepted(&self, parsed: usize, total: usize) -> bool {
        total > 0 && share(parsed, total) >= self.min_date_parse_share
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_boundary() {
        let p = RemediationPolicy::default();
        assert!(p.duplicates_fixable(50, 1000));
        assert!(!p.duplicates_fixable(51, 1000));
        assert!(!p.duplicates_fixable(0, 1000));
        // 5.01%
        assert!(!p.duplicates_fixable(501, 10_000));
    }

    #[test]
    fn test_negative_boundary() {
        let p = RemediationPolicy::default();
        assert!(p.negatives_fixable(10, 1000));
        assert!(!p.negatives_fixable(101, 10_000));
    }

    #[test]
    fn test_year_typo_boundary() {
        let p = RemediationPolicy::default();
        assert!(p.year_typo_matches(8, 10));
        assert!(!p.year_typo_matches(7, 10));
        assert!(!p.year_typo_matches(0, 0));
    }

    #[test]
    fn test_gender_boundary() {
        let p = RemediationPolicy::default();
        assert!(p.gender_fixable(10));
        assert!(!p.gender_fixable(11));
    }

    #[test]
    fn test_date_parse_boundary() {
        let p = RemediationPolicy::default();
        assert!(p.date_format_accepted(95, 100));
        assert!(!p.date_format_accepted(94, 100));
        assert!(!p.date_format_accepted(0, 0));
    }

    #[test]
    fn test_out_of_range_share_is_rejected() {
        let p = RemediationPolicy {
            max_duplicate_share: 1.5,
            ..Default::default()
        };
        assert!(p.validate().is_err());
        assert!(RemediationPolicy::default().validate().is_ok());
    }
}
