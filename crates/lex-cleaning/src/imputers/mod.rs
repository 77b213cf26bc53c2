//! Imputation module.
//!
//! Median fill for numeric columns and mode fill for text columns.

mod statistical;

pub use statistical::StatisticalImputer;
