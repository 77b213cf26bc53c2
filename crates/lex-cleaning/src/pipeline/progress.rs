//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline emits one [`ProgressUpdate`] when a stage starts and one when
//! it finishes, always in stage order.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_cleaning::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .process(df);
//! ```

use serde::{Deserialize, Serialize};

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleaningStage {
    /// Pipeline is starting
    Initializing,
    /// Canonicalizing column names
    HeaderNormalization,
    /// Replacing sentinel tokens with nulls
    SentinelReplacement,
    /// First duplicate row removal
    Deduplication,
    /// Heuristic per-column typing
    TypeInference,
    /// Date rule
    DateNormalization,
    /// Money rule
    MoneyNormalization,
    /// Percent rule
    PercentNormalization,
    /// Mode fill of text columns
    TextImputation,
    /// Closing duplicate row removal
    FinalDeduplication,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl CleaningStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::HeaderNormalization => "Normalizing Headers",
            Self::SentinelReplacement => "Replacing Sentinels",
            Self::Deduplication => "Removing Duplicates",
            Self::TypeInference => "Inferring Types",
            Self::DateNormalization => "Normalizing Dates",
            Self::MoneyNormalization => "Normalizing Money",
            Self::PercentNormalization => "Normalizing Percentages",
            Self::TextImputation => "Imputing Text",
            Self::FinalDeduplication => "Final Deduplication",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the typical weight of this stage in the overall pipeline (0.0 - 1.0).
    ///
    /// The weights of the processing stages sum to 1.0.
    pub fn weight(&self) -> f32 {
        match self {
            Self::Initializing => 0.02,
            Self::HeaderNormalization => 0.05,
            Self::SentinelReplacement => 0.08,
            Self::Deduplication => 0.08,
            Self::TypeInference => 0.30,
            Self::DateNormalization => 0.12,
            Self::MoneyNormalization => 0.10,
            Self::PercentNormalization => 0.08,
            Self::TextImputation => 0.12,
            Self::FinalDeduplication => 0.05,
            Self::Complete => 0.0,
            Self::Failed => 0.0,
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Initializing => 0.0,
            Self::HeaderNormalization => 0.02,
            Self::SentinelReplacement => 0.07,
            Self::Deduplication => 0.15,
            Self::TypeInference => 0.23,
            Self::DateNormalization => 0.53,
            Self::MoneyNormalization => 0.65,
            Self::PercentNormalization => 0.75,
            Self::TextImputation => 0.83,
            Self::FinalDeduplication => 0.95,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: CleaningStage,

    /// Optional sub-stage description (e.g., "Column: total_cost")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    /// Creates a new progress update for a stage.
    pub fn new(stage: CleaningStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            sub_stage: None,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    /// Creates a new progress update with sub-stage information.
    pub fn with_sub_stage(
        stage: CleaningStage,
        sub_stage: impl Into<String>,
        stage_progress: f32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sub_stage: Some(sub_stage.into()),
            ..Self::new(stage, stage_progress, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Complete, 1.0, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CleaningStage::Failed, 0.0, message)
    }
}

/// Trait for receiving progress updates during cleaning.
///
/// Implementations must be `Send + Sync` so a pipeline can be shared by
/// worker threads.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called when progress is made. Implementations should not block.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const PROCESSING_STAGES: [CleaningStage; 10] = [
        CleaningStage::Initializing,
        CleaningStage::HeaderNormalization,
        CleaningStage::SentinelReplacement,
        CleaningStage::Deduplication,
        CleaningStage::TypeInference,
        CleaningStage::DateNormalization,
        CleaningStage::MoneyNormalization,
        CleaningStage::PercentNormalization,
        CleaningStage::TextImputation,
        CleaningStage::FinalDeduplication,
    ];

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(CleaningStage::TypeInference, 0.5, "Inferring...");
        assert_eq!(update.stage, CleaningStage::TypeInference);
        assert!(update.sub_stage.is_none());
        assert!((update.progress - 0.38).abs() < 1e-6);
    }

    #[test]
    fn test_progress_update_with_sub_stage() {
        let update = ProgressUpdate::with_sub_stage(
            CleaningStage::MoneyNormalization,
            "Column: total_cost",
            1.0,
            "Money rule applied",
        );
        assert_eq!(update.sub_stage, Some("Column: total_cost".to_string()));
        assert_eq!(update.stage_progress, 1.0);
    }

    #[test]
    fn test_progress_update_complete() {
        let update = ProgressUpdate::complete("Done!");
        assert_eq!(update.stage, CleaningStage::Complete);
        assert_eq!(update.progress, 1.0);
    }

    #[test]
    fn test_stage_weights_sum() {
        let total_weight: f32 = PROCESSING_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total_weight - 1.0).abs() < 0.01, "Weights should sum to ~1.0");
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        for pair in PROCESSING_STAGES.windows(2) {
            let expected = pair[0].base_progress() + pair[0].weight();
            assert!(
                (pair[1].base_progress() - expected).abs() < 1e-4,
                "{:?} does not start where {:?} ends",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_closure_progress_reporter_across_threads() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = Arc::new(ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let reporter_clone = reporter.clone();
        let handle = std::thread::spawn(move || {
            reporter_clone.report(ProgressUpdate::new(CleaningStage::TypeInference, 0.5, "Test"));
        });
        handle.join().expect("Thread should not panic");
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_json_values() {
        let json = serde_json::to_string(&CleaningStage::PercentNormalization).unwrap();
        assert_eq!(json, "\"percent_normalization\"");
        let json = serde_json::to_string(&CleaningStage::FinalDeduplication).unwrap();
        assert_eq!(json, "\"final_deduplication\"");
    }
}
