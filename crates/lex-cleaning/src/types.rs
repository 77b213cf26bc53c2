use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

/// Semantic type assigned to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Stored as `Float64`.
    Numeric,
    /// Stored as `DD/MM/YYYY` text.
    Date,
    /// Stored as trimmed text.
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Text => "text",
        }
    }
}

/// Which part of the pipeline made a column decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "rule")]
pub enum DecisionSource {
    /// The shape-based type inference engine.
    Heuristic,
    /// A name-keyed rule, identified by its rule name.
    NameRule(String),
}

/// A classification made for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDecision {
    pub column: String,
    pub kind: ColumnKind,
    pub source: DecisionSource,
}

impl ColumnDecision {
    pub fn heuristic(column: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            column: column.into(),
            kind,
            source: DecisionSource::Heuristic,
        }
    }

    pub fn rule(column: impl Into<String>, kind: ColumnKind, rule: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            kind,
            source: DecisionSource::NameRule(rule.into()),
        }
    }
}

/// Type of cleaning action performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A header was canonicalized.
    ColumnRenamed,
    /// Sentinel tokens were replaced by nulls.
    SentinelsReplaced,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
    /// The heuristic engine typed a column.
    TypeInferred,
    /// A name-keyed rule rewrote a column.
    RuleApplied,
    /// Missing values were imputed.
    ValueImputed,
}

/// A single recorded cleaning action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningAction {
    pub action_type: ActionType,
    /// Column name, or "dataset" for table-wide actions.
    pub target: String,
    pub description: String,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,
    pub columns: usize,

    /// Rows dropped by the deduplication pass that precedes inference.
    pub duplicates_removed_initial: usize,
    /// Rows dropped by the closing deduplication pass.
    pub duplicates_removed_final: usize,

    /// Number of cells replaced by null in the sentinel pass.
    pub sentinels_replaced: usize,

    /// Final column names in table order.
    pub column_names: Vec<String>,

    /// Every classification made, in the order it was made.
    pub decisions: Vec<ColumnDecision>,

    pub actions: Vec<CleaningAction>,

    pub warnings: Vec<String>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// The last kind assigned to `column`, whichever stage assigned it.
    pub fn final_kind(&self, column: &str) -> Option<ColumnKind> {
        self.decisions
            .iter()
            .rev()
            .find(|d| d.column == column)
            .map(|d| d.kind)
    }

    /// The kind the heuristic engine assigned to `column`, if it typed it.
    pub fn heuristic_kind(&self, column: &str) -> Option<ColumnKind> {
        self.decisions
            .iter()
            .find(|d| d.column == column && d.source == DecisionSource::Heuristic)
            .map(|d| d.kind)
    }

    pub fn duplicates_removed(&self) -> usize {
        self.duplicates_removed_initial + self.duplicates_removed_final
    }
}

/// Result of running the pipeline over one table.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub data: DataFrame,
    pub summary: CleaningSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_kind_prefers_latest_decision() {
        let mut summary = CleaningSummary::new();
        summary
            .decisions
            .push(ColumnDecision::heuristic("ship_date", ColumnKind::Text));
        summary
            .decisions
            .push(ColumnDecision::rule("ship_date", ColumnKind::Date, "date"));

        assert_eq!(summary.final_kind("ship_date"), Some(ColumnKind::Date));
        assert_eq!(summary.heuristic_kind("ship_date"), Some(ColumnKind::Text));
        assert_eq!(summary.final_kind("missing"), None);
    }

    #[test]
    fn test_decision_source_serialization() {
        let decision = ColumnDecision::rule("total_cost", ColumnKind::Numeric, "money");
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains("\"kind\":\"numeric\""));
        assert!(json.contains("\"rule\":\"money\""));
    }
}
