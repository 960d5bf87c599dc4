//! Declarative rule model.
//!
//! A `RuleSpec` maps parameter names to rulesets. A ruleset is a rule plus a
//! `required` flag; a bare `Rule` converts into a non-required ruleset, so
//! both spec shapes (`{type: rule, required}` and the bare rule) are accepted.

use crate::errors::ValidateError;
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;

/// Closed set of rule kinds a parameter value can be checked against.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Any string value.
    Text,
    /// Whole number (or numeric string when coercion is on).
    Integer,
    /// Any number (or numeric string when coercion is on).
    Number,
    /// Boolean (or `"true"`/`"false"` when coercion is on).
    Boolean,
    /// String shaped like an email address.
    Email,
    /// One of a fixed set of allowed values.
    OneOf(Vec<JsonValue>),
    /// String matching a compiled pattern.
    Pattern(Regex),
    /// Nested object whose fields carry their own rulesets.
    Object(BTreeMap<String, Ruleset>),
}

impl Rule {
    /// Compile a pattern rule. Fails on an invalid regular expression.
    pub fn pattern(source: &str) -> Result<Self, ValidateError> {
        Ok(Rule::Pattern(Regex::new(source)?))
    }

    /// Enum rule over a fixed value set.
    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonValue>,
    {
        Rule::OneOf(values.into_iter().map(Into::into).collect())
    }

    /// Wrap this rule with the `required` flag set.
    pub fn required(self) -> Ruleset {
        Ruleset {
            rule: self,
            required: true,
        }
    }

    /// Short tag naming the rule kind, used in mismatch reports.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Text => "string",
            Rule::Integer => "integer",
            Rule::Number => "number",
            Rule::Boolean => "boolean",
            Rule::Email => "email",
            Rule::OneOf(_) => "enum",
            Rule::Pattern(_) => "pattern",
            Rule::Object(_) => "object",
        }
    }

    /// JSON description of the rule, used when serializing a rule spec.
    pub fn describe(&self) -> JsonValue {
        match self {
            Rule::Text | Rule::Integer | Rule::Number | Rule::Boolean | Rule::Email => {
                JsonValue::String(self.name().to_string())
            }
            Rule::OneOf(values) => json!({ "enum": values }),
            Rule::Pattern(regex) => json!({ "pattern": regex.as_str() }),
            Rule::Object(fields) => {
                let described: serde_json::Map<String, JsonValue> = fields
                    .iter()
                    .map(|(name, ruleset)| (name.clone(), ruleset.describe()))
                    .collect();
                json!({ "object": described })
            }
        }
    }
}

/// A rule plus its `required` flag.
#[derive(Debug, Clone)]
pub struct Ruleset {
    pub rule: Rule,
    pub required: bool,
}

impl Ruleset {
    pub fn describe(&self) -> JsonValue {
        json!({ "type": self.rule.describe(), "required": self.required })
    }
}

impl From<Rule> for Ruleset {
    fn from(rule: Rule) -> Self {
        Ruleset {
            rule,
            required: false,
        }
    }
}

/// Ordered mapping from parameter name to ruleset.
///
/// Ordered so mismatch maps, serialized output, and log lines come out
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    fields: BTreeMap<String, Ruleset>,
}

impl RuleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule for one parameter. Accepts a bare `Rule` or a `Ruleset`.
    pub fn field(mut self, name: impl Into<String>, ruleset: impl Into<Ruleset>) -> Self {
        self.fields.insert(name.into(), ruleset.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Ruleset> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Ruleset)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON form of the whole spec, normalized to the wrapped
    /// `{"type": ..., "required": ...}` shape.
    pub fn to_json(&self) -> JsonValue {
        let described: serde_json::Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(name, ruleset)| (name.clone(), ruleset.describe()))
            .collect();
        JsonValue::Object(described)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_rule_is_not_required() {
        let ruleset: Ruleset = Rule::Text.into();
        assert!(!ruleset.required);
    }

    #[test]
    fn test_required_wraps_rule() {
        let ruleset = Rule::Integer.required();
        assert!(ruleset.required);
        assert_eq!(ruleset.rule.name(), "integer");
    }

    #[test]
    fn test_pattern_rule_compiles() {
        let rule = Rule::pattern(r"^\d{4}$").unwrap();
        assert_eq!(rule.name(), "pattern");
    }

    #[test]
    fn test_pattern_rule_rejects_bad_regex() {
        assert!(Rule::pattern("(unclosed").is_err());
    }

    #[test]
    fn test_spec_describes_wrapped_shape() {
        let spec = RuleSpec::new()
            .field("email", Rule::Email.required())
            .field("age", Rule::Integer);

        let described = spec.to_json();
        assert_eq!(described["email"], json!({"type": "email", "required": true}));
        assert_eq!(described["age"], json!({"type": "integer", "required": false}));
    }

    #[test]
    fn test_enum_and_pattern_descriptions() {
        let spec = RuleSpec::new()
            .field("role", Rule::one_of(["admin", "user"]))
            .field("zip", Rule::pattern(r"^\d{5}$").unwrap());

        let described = spec.to_json();
        assert_eq!(described["role"]["type"], json!({"enum": ["admin", "user"]}));
        assert_eq!(described["zip"]["type"], json!({"pattern": r"^\d{5}$"}));
    }

    #[test]
    fn test_spec_lookup_by_name() {
        let spec = RuleSpec::new()
            .field("email", Rule::Email.required())
            .field("age", Rule::Integer);
        assert!(spec.get("email").is_some_and(|ruleset| ruleset.required));
        assert!(spec.get("age").is_some_and(|ruleset| !ruleset.required));
        assert!(spec.get("name").is_none());
    }

    #[test]
    fn test_spec_iteration_is_ordered() {
        let spec = RuleSpec::new()
            .field("b", Rule::Text)
            .field("a", Rule::Text);
        let names: Vec<&String> = spec.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
