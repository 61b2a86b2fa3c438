// claimsguard-core/src/domain/dataset/kind.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::DomainError;

/// Logical name of an extracted dataset.
/// Declaration order is the canonical processing/reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Members,
    MedicalClaims,
    PharmacyClaims,
    QualityMeasures,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Members,
        DatasetKind::MedicalClaims,
        DatasetKind::PharmacyClaims,
        DatasetKind::QualityMeasures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::MedicalClaims => "medical_claims",
            Self::PharmacyClaims => "pharmacy_claims",
            Self::QualityMeasures => "quality_measures",
        }
    }

    /// Columns whose absence is a structural (critical) defect.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Members => &[
                "member_id",
                "first_name",
                "last_name",
                "date_of_birth",
                "gender",
                "hcc_risk_score",
            ],
            Self::MedicalClaims => &["claim_id", "member_id", "service_date", "paid_amount"],
            Self::PharmacyClaims => &[
                "claim_id",
                "member_id",
                "fill_date",
                "paid_amount",
                "drug_name",
            ],
            Self::QualityMeasures => &[
                "measure_id",
                "measure_name",
                "measure_category",
                "numerator",
                "denominator",
            ],
        }
    }

    pub fn key_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Members => &["member_id"],
            Self::MedicalClaims | Self::PharmacyClaims => &["claim_id"],
            Self::QualityMeasures => &["measure_id"],
        }
    }

    pub fn default_expected_volume(&self) -> usize {
        match self {
            Self::Members => 12_000,
            Self::MedicalClaims => 50_000,
            Self::PharmacyClaims => 15_000,
            Self::QualityMeasures => 23,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "members" => Ok(Self::Members),
            "medical_claims" => Ok(Self::MedicalClaims),
            "pharmacy_claims" => Ok(Self::PharmacyClaims),
            "quality_measures" => Ok(Self::QualityMeasures),
            _ => Err(DomainError::UnknownDataset(s.to_string())),
        }
    }
}
