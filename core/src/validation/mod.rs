pub mod matcher;
pub mod rules;

pub use matcher::{is_truthy, MatchOptions, Mismatch, RuleMatcher};
pub use rules::{Rule, RuleSpec, Ruleset};
