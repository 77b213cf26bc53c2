//! Report generation module.
//!
//! Reports are used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON files next to the cleaned data (`--emit-report` CLI flag)
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_cleaning::reporting::{BatchReport, ReportGenerator};
//!
//! let report = BatchReport::from_summary(&batch_summary);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("cleaned data"));
//! generator.write_batch_report(&report)?;
//! ```

mod generator;

pub use generator::{BatchReport, FileReport, ReportGenerator};
