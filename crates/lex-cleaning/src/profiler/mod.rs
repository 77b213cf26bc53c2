//! Column profiling module.
//!
//! Shape-based classification of columns into numeric, date or text.

mod type_inference;

pub use type_inference::{TypeInferenceEngine, classify_column};
