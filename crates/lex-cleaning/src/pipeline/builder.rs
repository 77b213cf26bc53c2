//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the cleaning stages in their fixed order.

use crate::cleaner::headers::normalize_headers;
use crate::cleaner::sanitizers::{remove_duplicate_rows, replace_sentinels};
use crate::config::{CleanerConfig, ConfigValidationError};
use crate::error::{CleaningError, Result};
use crate::imputers::StatisticalImputer;
use crate::pipeline::progress::{
    CleaningStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::TypeInferenceEngine;
use crate::rules::RuleTable;
use crate::types::{ActionType, CleaningAction, CleaningResult, CleaningSummary};
use crate::utils::column_names;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// The cleaning pipeline.
///
/// Stages run in a fixed order: header normalization, sentinel replacement,
/// deduplication, type inference, the name rules (date, money, percent),
/// text mode imputation and a closing deduplication pass.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{CleanerConfig, Pipeline};
///
/// let result = Pipeline::builder()
///     .config(CleanerConfig::default())
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .process(dataframe)?;
/// ```
pub struct Pipeline {
    config: CleanerConfig,
    rules: RuleTable,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Files may be cleaned on worker threads sharing one pipeline
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Clean a raw table.
    ///
    /// Cell-level parse failures never fail the run; they become nulls. An
    /// error means the table as a whole could not be processed, e.g. a header
    /// collision under [`CollisionPolicy::Reject`](crate::config::CollisionPolicy::Reject).
    pub fn process(&self, df: DataFrame) -> Result<CleaningResult> {
        match self.process_internal(df) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Cleaning completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn start_stage(&self, stage: CleaningStage) {
        debug!("Stage: {}", stage.display_name());
        self.report_progress(ProgressUpdate::new(
            stage,
            0.0,
            format!("{}...", stage.display_name()),
        ));
    }

    fn finish_stage(&self, stage: CleaningStage, message: impl Into<String>) {
        self.report_progress(ProgressUpdate::new(stage, 1.0, message));
    }

    fn process_internal(&self, df: DataFrame) -> Result<CleaningResult> {
        let start_time = Instant::now();

        info!(
            "Starting cleaning pipeline ({} rows x {} columns)...",
            df.height(),
            df.width()
        );
        self.start_stage(CleaningStage::Initializing);

        let mut summary = CleaningSummary::new();
        summary.rows_before = df.height();

        // Step 1: Canonical headers
        self.start_stage(CleaningStage::HeaderNormalization);
        let (df, renames) = normalize_headers(df, self.config.column_collision)?;
        for (original, normalized) in &renames {
            summary.add_action(CleaningAction::new(
                ActionType::ColumnRenamed,
                normalized,
                format!("Renamed '{}' to '{}'", original, normalized),
            ));
            if normalized.is_empty() {
                summary.add_warning(format!(
                    "Column '{}' normalizes to an empty name",
                    original
                ));
            }
        }
        self.finish_stage(
            CleaningStage::HeaderNormalization,
            format!("Renamed {} columns", renames.len()),
        );

        // Step 2: Sentinels to null
        self.start_stage(CleaningStage::SentinelReplacement);
        let (df, replaced) = replace_sentinels(df, &self.config.sentinel_tokens)
            .map_err(|e| CleaningError::CleaningFailed(e.to_string()))?;
        summary.sentinels_replaced = replaced;
        if replaced > 0 {
            summary.add_action(CleaningAction::new(
                ActionType::SentinelsReplaced,
                "dataset",
                format!("Replaced {} sentinel values with null", replaced),
            ));
        }
        self.finish_stage(
            CleaningStage::SentinelReplacement,
            format!("Replaced {} sentinel values", replaced),
        );

        // Step 3: First dedup pass
        let df = self.deduplicate(df, CleaningStage::Deduplication, &mut summary)?;

        // Step 4: Heuristic typing
        self.start_stage(CleaningStage::TypeInference);
        let df = TypeInferenceEngine::new(&self.config)
            .infer_and_convert(df, &mut summary)
            .map_err(|e| CleaningError::CleaningFailed(e.to_string()))?;
        self.finish_stage(CleaningStage::TypeInference, "Type inference complete");

        // Step 5: Name rules, in table order
        let mut df = df;
        for rule in self.rules.rules() {
            let stage = rule.transform().stage();
            self.start_stage(stage);

            let targets = rule.matching_columns(&df);
            for (i, col_name) in targets.iter().enumerate() {
                df = rule
                    .apply_column(df, col_name, &mut summary)
                    .map_err(|e| CleaningError::CleaningFailed(e.to_string()))?;
                self.report_progress(ProgressUpdate::with_sub_stage(
                    stage,
                    format!("Column: {}", col_name),
                    (i + 1) as f32 / targets.len() as f32,
                    format!("Rule '{}' applied to '{}'", rule.name(), col_name),
                ));
            }

            self.finish_stage(stage, format!("Rule '{}' applied", rule.name()));
        }

        // Step 6: Residual text nulls
        self.start_stage(CleaningStage::TextImputation);
        let df = StatisticalImputer::fill_text_modes(df, &self.config.text_null_tokens, &mut summary)
            .map_err(|e| CleaningError::CleaningFailed(e.to_string()))?;
        self.finish_stage(CleaningStage::TextImputation, "Text imputation complete");

        // Step 7: Normalization can make rows identical
        let df = self.deduplicate(df, CleaningStage::FinalDeduplication, &mut summary)?;

        summary.rows_after = df.height();
        summary.columns = df.width();
        summary.column_names = column_names(&df);
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Cleaning complete: {} -> {} rows, {} duplicates removed, {} sentinels replaced in {}ms",
            summary.rows_before,
            summary.rows_after,
            summary.duplicates_removed(),
            summary.sentinels_replaced,
            summary.duration_ms
        );

        Ok(CleaningResult { data: df, summary })
    }

    fn deduplicate(
        &self,
        df: DataFrame,
        stage: CleaningStage,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        self.start_stage(stage);

        if !self.config.remove_duplicates {
            self.finish_stage(stage, "Duplicate removal disabled");
            return Ok(df);
        }

        let (df, removed) =
            remove_duplicate_rows(df).map_err(|e| CleaningError::CleaningFailed(e.to_string()))?;

        if stage == CleaningStage::FinalDeduplication {
            summary.duplicates_removed_final = removed;
        } else {
            summary.duplicates_removed_initial = removed;
        }
        if removed > 0 {
            summary.add_action(CleaningAction::new(
                ActionType::DuplicatesRemoved,
                "dataset",
                format!("Removed {} duplicate rows ({})", removed, stage.display_name()),
            ));
        }

        self.finish_stage(stage, format!("Removed {} duplicate rows", removed));
        Ok(df)
    }
}

/// Builder for creating a [`Pipeline`] instance.
///
/// Use [`Pipeline::builder()`] to get started.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleanerConfig>,
    rules: Option<RuleTable>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replace the name rule table.
    ///
    /// By default the table is built from the configured keywords with
    /// [`RuleTable::from_config`].
    pub fn rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let rules = self
            .rules
            .unwrap_or_else(|| RuleTable::from_config(&config));

        Ok(Pipeline {
            config,
            rules,
            progress_reporter: self.progress_reporter,
        })
    }
}
