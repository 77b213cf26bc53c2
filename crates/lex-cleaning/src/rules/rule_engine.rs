//! Ordered table of `(name predicate, transform)` rules.

use crate::cleaner::converters::{money_to_numbers, percent_to_numbers, strings_to_dates};
use crate::config::CleanerConfig;
use crate::imputers::StatisticalImputer;
use crate::pipeline::CleaningStage;
use crate::types::{ActionType, CleaningAction, CleaningSummary, ColumnDecision, ColumnKind};
use crate::utils::{
    column_names, name_contains_any, replace_with_numbers, replace_with_text, text_values,
};
use anyhow::Result;
use polars::prelude::*;
use tracing::debug;

/// What a rule does to a matching column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTransform {
    /// Re-parse day-first and render as `DD/MM/YYYY`; unparseable becomes null.
    DateRender,
    /// Strip money formatting, parse, fill nulls with the median.
    MoneyNumeric,
    /// Strip `%`, parse; nulls are kept.
    PercentNumeric,
}

impl RuleTransform {
    /// Kind of the column after the transform.
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::DateRender => ColumnKind::Date,
            Self::MoneyNumeric | Self::PercentNumeric => ColumnKind::Numeric,
        }
    }

    /// Pipeline stage the transform runs in.
    pub fn stage(&self) -> CleaningStage {
        match self {
            Self::DateRender => CleaningStage::DateNormalization,
            Self::MoneyNumeric => CleaningStage::MoneyNormalization,
            Self::PercentNumeric => CleaningStage::PercentNormalization,
        }
    }
}

/// A single name-keyed rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NameRule {
    name: String,
    keywords: Vec<String>,
    transform: RuleTransform,
}

impl NameRule {
    pub fn new(name: impl Into<String>, keywords: Vec<String>, transform: RuleTransform) -> Self {
        Self {
            name: name.into(),
            keywords,
            transform,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> RuleTransform {
        self.transform
    }

    /// Whether the column name contains any of the rule's keywords.
    pub fn matches(&self, col_name: &str) -> bool {
        name_contains_any(col_name, &self.keywords)
    }

    /// Names of the columns of `df` the rule applies to, in column order.
    pub fn matching_columns(&self, df: &DataFrame) -> Vec<String> {
        column_names(df)
            .into_iter()
            .filter(|c| self.matches(c))
            .collect()
    }

    /// Rewrite every matching column of `df`.
    pub fn apply(&self, df: DataFrame, summary: &mut CleaningSummary) -> Result<DataFrame> {
        let mut df = df;
        for col_name in self.matching_columns(&df) {
            df = self.apply_column(df, &col_name, summary)?;
        }
        Ok(df)
    }

    /// Rewrite a single column of `df`.
    pub fn apply_column(
        &self,
        df: DataFrame,
        col_name: &str,
        summary: &mut CleaningSummary,
    ) -> Result<DataFrame> {
        let mut df = df;
        let series = df.column(col_name)?.as_materialized_series().clone();
        let values = text_values(&series)?;

        match self.transform {
            RuleTransform::DateRender => {
                let dates = strings_to_dates(&values);
                let lost = count_lost(&values, dates.iter().map(Option::is_some));
                replace_with_text(&mut df, col_name, dates)?;
                self.record(summary, col_name, lost);
            }
            RuleTransform::MoneyNumeric => {
                let mut numbers = money_to_numbers(&values);
                let lost = count_lost(&values, numbers.iter().map(Option::is_some));
                if let Some((median_val, filled)) = StatisticalImputer::fill_median(&mut numbers)
                    && filled > 0
                {
                    summary.add_action(CleaningAction::new(
                        ActionType::ValueImputed,
                        col_name,
                        format!("Filled {} missing values with median {}", filled, median_val),
                    ));
                }
                replace_with_numbers(&mut df, col_name, numbers)?;
                self.record(summary, col_name, lost);
            }
            RuleTransform::PercentNumeric => {
                let numbers = percent_to_numbers(&values);
                let lost = count_lost(&values, numbers.iter().map(Option::is_some));
                replace_with_numbers(&mut df, col_name, numbers)?;
                self.record(summary, col_name, lost);
            }
        }

        Ok(df)
    }

    fn record(&self, summary: &mut CleaningSummary, col_name: &str, lost: usize) {
        let kind = self.transform.kind();
        debug!(
            "Rule '{}' rewrote '{}' as {} ({} unparseable)",
            self.name,
            col_name,
            kind.as_str(),
            lost
        );
        summary
            .decisions
            .push(ColumnDecision::rule(col_name, kind, &self.name));
        summary.add_action(CleaningAction::new(
            ActionType::RuleApplied,
            col_name,
            format!(
                "Rule '{}' converted column to {} ({} unparseable values set to null)",
                self.name,
                kind.as_str(),
                lost
            ),
        ));
    }
}

/// Count values that were present before a conversion and missing after it.
fn count_lost(before: &[Option<String>], after: impl Iterator<Item = bool>) -> usize {
    before
        .iter()
        .zip(after)
        .filter(|(b, present)| b.is_some() && !present)
        .count()
}

/// Ordered rule table.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<NameRule>,
}

impl RuleTable {
    /// Build a table from explicit rules, kept in the given order.
    pub fn new(rules: Vec<NameRule>) -> Self {
        Self { rules }
    }

    /// The standard table: date, then money, then percent.
    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(vec![
            NameRule::new(
                "date",
                config.date_keywords.clone(),
                RuleTransform::DateRender,
            ),
            NameRule::new(
                "money",
                config.money_keywords.clone(),
                RuleTransform::MoneyNumeric,
            ),
            NameRule::new(
                "percent",
                config.percent_keywords.clone(),
                RuleTransform::PercentNumeric,
            ),
        ])
    }

    pub fn rules(&self) -> &[NameRule] {
        &self.rules
    }

    /// Rules matching a column, in evaluation order.
    pub fn matching(&self, col_name: &str) -> Vec<&NameRule> {
        self.rules.iter().filter(|r| r.matches(col_name)).collect()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::from_config(&CleanerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::text_values;

    fn numbers(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn rule(table: &RuleTable, name: &str) -> NameRule {
        table
            .rules()
            .iter()
            .find(|r| r.name() == name)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_table_order() {
        let table = RuleTable::default();
        let names: Vec<&str> = table.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["date", "money", "percent"]);
    }

    #[test]
    fn test_matching() {
        let table = RuleTable::default();
        let names = |col: &str| -> Vec<String> {
            table
                .matching(col)
                .iter()
                .map(|r| r.name().to_string())
                .collect()
        };

        assert_eq!(names("failuredate"), vec!["date"]);
        assert_eq!(names("totalprice"), vec!["money"]);
        assert_eq!(names("fail_pct"), vec!["percent"]);
        assert_eq!(names("%fail"), vec!["percent"]);
        assert_eq!(names("total_cost_date"), vec!["date", "money"]);
        assert!(names("update_count").contains(&"date".to_string()));
        assert!(names("severity").is_empty());
    }

    #[test]
    fn test_money_rule_with_median() {
        let df = df!("Total_Cost" => &["$1,200", "1,000.50", "bad"]).unwrap();
        let mut summary = CleaningSummary::new();

        let df = rule(&RuleTable::default(), "money")
            .apply(df, &mut summary)
            .unwrap();

        assert_eq!(
            numbers(&df, "Total_Cost"),
            vec![Some(1200.0), Some(1000.5), Some(1100.25)]
        );
        assert_eq!(summary.final_kind("Total_Cost"), Some(ColumnKind::Numeric));
    }

    #[test]
    fn test_money_rule_reprocesses_numeric_column() {
        let df = df!("price" => &[Some(10.5), None, Some(-2.0)]).unwrap();
        let mut summary = CleaningSummary::new();

        let df = rule(&RuleTable::default(), "money")
            .apply(df, &mut summary)
            .unwrap();

        assert_eq!(numbers(&df, "price"), vec![Some(10.5), Some(4.25), Some(-2.0)]);
    }

    #[test]
    fn test_money_rule_all_unparseable_stays_null() {
        let df = df!("salary" => &[Some("n/a"), Some("tbd"), None]).unwrap();
        let mut summary = CleaningSummary::new();

        let df = rule(&RuleTable::default(), "money")
            .apply(df, &mut summary)
            .unwrap();

        assert_eq!(df.column("salary").unwrap().null_count(), 3);
        assert_eq!(df.column("salary").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_percent_rule_keeps_nulls() {
        let df = df!("%Fail" => &["10%", "5", "n/a"]).unwrap();
        let mut summary = CleaningSummary::new();

        let df = rule(&RuleTable::default(), "percent")
            .apply(df, &mut summary)
            .unwrap();

        assert_eq!(numbers(&df, "%Fail"), vec![Some(10.0), Some(5.0), None]);
    }

    #[test]
    fn test_date_rule_overrides_text() {
        let df = df!(
            "ship_date" => &[Some("2020-01-15"), Some("soon"), Some("15 Feb 2020"), None]
        )
        .unwrap();
        let mut summary = CleaningSummary::new();

        let df = rule(&RuleTable::default(), "date")
            .apply(df, &mut summary)
            .unwrap();

        let values = text_values(df.column("ship_date").unwrap().as_materialized_series()).unwrap();
        assert_eq!(
            values,
            vec![
                Some("15/01/2020".to_string()),
                None,
                Some("15/02/2020".to_string()),
                None
            ]
        );
        assert!(
            summary
                .actions
                .iter()
                .any(|a| a.action_type == ActionType::RuleApplied && a.description.contains("1 unparseable"))
        );
    }

    #[test]
    fn test_date_rule_reads_compact_numbers() {
        let df = df!("testdate" => &[Some(20200115.0), None]).unwrap();
        let mut summary = CleaningSummary::new();

        let df = rule(&RuleTable::default(), "date")
            .apply(df, &mut summary)
            .unwrap();

        let values = text_values(df.column("testdate").unwrap().as_materialized_series()).unwrap();
        assert_eq!(values, vec![Some("15/01/2020".to_string()), None]);
    }
}
