//! Name-keyed rules.
//!
//! After heuristic inference, columns with recognizable names are rewritten
//! regardless of how the heuristic engine classified them. The rules live in
//! an ordered [`RuleTable`] and run in table order: date, money, percent.
//! A column matched by several rules is rewritten by each, in that order.

mod rule_engine;

pub use rule_engine::{NameRule, RuleTable, RuleTransform};
