// claimsguard-core/src/domain/remediation/strategies/mod.rs

//! Bounded corrections. Each strategy takes ownership of the table and hands it
//! back, changed only when its safety threshold allows.

pub mod amounts;
pub mod dates;
pub mod duplicates;
pub mod gender;

pub use amounts::fix_negative_amounts;
pub use dates::{fix_date_formats, fix_future_dates};
pub use duplicates::fix_duplicates;
pub use gender::fix_gender_mismatch;
