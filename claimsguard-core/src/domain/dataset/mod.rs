// claimsguard-core/src/domain/dataset/mod.rs

pub mod kind;
pub mod table;

pub use kind::DatasetKind;
pub use table::{Table, TableError, Value, parse_lenient_date};

/// Share of `count` over `total`, zero for an empty table.
pub fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
