// claimsguard-core/src/domain/validation/configuration.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use crate::domain::dataset::DatasetKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ValidationConfig {
    /// Expected row counts for the volume check; missing datasets use built-in defaults.
    pub expected_volumes: BTreeMap<DatasetKind, usize>,

    #[validate(range(min = 0.0, max = 1.0))]
    pub volume_tolerance: f64,

    /// Worst per-field null share above which missing values become critical.
    #[validate(range(min = 0.0, max = 1.0))]
    pub null_critical_share: f64,

    #[validate(range(min = 0.0))]
    pub high_cost_threshold: f64,

    #[validate(range(min = 1.0))]
    pub max_age_years: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            expected_volumes: BTreeMap::new(),
            volume_tolerance: 0.20,
            null_critical_share: 0.05,
            high_cost_threshold: 500_000.0,
            max_age_years: 120.0,
        }
    }
}

impl ValidationConfig {
    pub fn expected_volume(&self, dataset: DatasetKind) -> usize {
        self.expected_volumes
            .get(&dataset)
            .copied()
            .unwrap_or_else(|| dataset.default_expected_volume())
    }
}
