//! Heuristic CSV Cleaning Library
//!
//! Turns raw, schema-unknown tables into analysis-ready ones built with Rust
//! and Polars.
//!
//! # Overview
//!
//! Every table goes through the same fixed sequence of stages:
//!
//! - **Header Normalization**: trimmed, lowercased, `[a-z0-9_]` column names
//! - **Sentinel Replacement**: `NA`, `N/A`, `--`, `null`, ... become nulls
//! - **Deduplication**: exact duplicate rows are dropped, first occurrence kept
//! - **Type Inference**: each column is classified numeric, date or text from
//!   its values, converted and imputed
//! - **Name Rules**: columns named like dates, money or percentages are
//!   rewritten regardless of the inferred type
//! - **Text Imputation**: residual text nulls take the column mode
//! - **Final Deduplication**: rows made identical by normalization are dropped
//!
//! Dates are written as `DD/MM/YYYY` text and numbers as `Float64`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_cleaning::{Pipeline, io::read_raw_table};
//!
//! let df = read_raw_table(Path::new("sales.csv"))?;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .process(df)?;
//!
//! println!("{} rows after cleaning", result.summary.rows_after);
//! ```
//!
//! # Batch Processing
//!
//! ```rust,ignore
//! use lex_cleaning::{BatchDriver, Pipeline};
//!
//! let pipeline = Pipeline::builder().build()?;
//! let summary = BatchDriver::new(&pipeline, "cleaned data").run(Path::new("raw"))?;
//! ```
//!
//! A file that cannot be read, cleaned or written is logged and recorded as
//! failed; the rest of the batch still runs.
//!
//! # Configuration
//!
//! ```rust,ignore
//! use lex_cleaning::config::*;
//!
//! let config = CleanerConfig::builder()
//!     .money_keywords(["salary", "revenue", "cost", "fee"])
//!     .column_collision(CollisionPolicy::Reject)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod rules;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{normalize_column_name, normalize_column_names, parse_day_first};
pub use config::{CleanerConfig, CleanerConfigBuilder, CollisionPolicy, ConfigValidationError};
pub use error::{CleaningError, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{BatchDriver, BatchSummary, FileOutcome, process_directory};
pub use pipeline::{
    CleaningStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use profiler::{TypeInferenceEngine, classify_column};
pub use reporting::{BatchReport, FileReport, ReportGenerator};
pub use rules::{NameRule, RuleTable, RuleTransform};
pub use types::{
    ActionType, CleaningAction, CleaningResult, CleaningSummary, ColumnDecision, ColumnKind,
    DecisionSource,
};
