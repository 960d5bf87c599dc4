//! Rule matching engine.
//!
//! `RuleMatcher::check` takes the current value of a parameter (or `None`
//! when the parameter was not submitted) and its ruleset, and reports a
//! `Mismatch` when the value does not conform. An absent value always
//! mismatches; the caller only asks about absent values for required keys.

use crate::validation::rules::{Rule, Ruleset};
use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

/// Structured description of a failed rule check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    /// Tag of the rule kind that failed (`"string"`, `"integer"`, ...).
    pub rule: String,
    /// Human-readable description, rendered on the `  -> ` lines of the
    /// error's log form.
    pub message: String,
    /// The offending value, when one was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<JsonValue>,
}

/// Matching knobs.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Accept numeric and boolean strings for `Integer`/`Number`/`Boolean`
    /// rules. Query and form parameters always arrive as strings, so this
    /// defaults to on.
    pub coerce_strings: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            coerce_strings: true,
        }
    }
}

/// Checks values against rulesets.
#[derive(Debug, Clone, Default)]
pub struct RuleMatcher {
    options: MatchOptions,
}

impl RuleMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Check one value against one ruleset.
    ///
    /// Returns `None` when the value conforms. `None` input (parameter not
    /// submitted) always produces a mismatch; "missing but required" is
    /// encoded here rather than in the caller.
    pub fn check(&self, value: Option<&JsonValue>, ruleset: &Ruleset) -> Option<Mismatch> {
        let Some(value) = value else {
            return Some(Mismatch {
                rule: ruleset.rule.name().to_string(),
                message: format!(
                    "required {} value is missing",
                    ruleset.rule.name()
                ),
                actual: None,
            });
        };
        self.check_rule(value, &ruleset.rule)
    }

    fn check_rule(&self, value: &JsonValue, rule: &Rule) -> Option<Mismatch> {
        let conforms = match rule {
            Rule::Text => value.is_string(),
            Rule::Integer => {
                value.as_i64().is_some()
                    || value.as_u64().is_some()
                    || self.coerced(value).is_some_and(|s| s.parse::<i64>().is_ok())
            }
            Rule::Number => {
                value.is_number()
                    || self
                        .coerced(value)
                        .is_some_and(|s| s.parse::<f64>().is_ok_and(f64::is_finite))
            }
            Rule::Boolean => {
                value.is_boolean()
                    || self.coerced(value).is_some_and(|s| s == "true" || s == "false")
            }
            Rule::Email => value.as_str().is_some_and(|s| email_pattern().is_match(s)),
            Rule::OneOf(allowed) => allowed.iter().any(|candidate| {
                candidate == value
                    || (self.options.coerce_strings
                        && value.as_str().is_some_and(|s| scalar_text(candidate).as_deref() == Some(s)))
            }),
            Rule::Pattern(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
            Rule::Object(fields) => return self.check_object(value, rule, fields),
        };

        if conforms {
            None
        } else {
            Some(Mismatch {
                rule: rule.name().to_string(),
                message: format!("expected {} value, got {}", rule.name(), render(value)),
                actual: Some(value.clone()),
            })
        }
    }

    /// Nested object rule: each field follows the same present-and-truthy or
    /// required gating as top-level parameters. The first failing field wins,
    /// path-qualified in the message (field order is deterministic).
    fn check_object(
        &self,
        value: &JsonValue,
        rule: &Rule,
        fields: &std::collections::BTreeMap<String, Ruleset>,
    ) -> Option<Mismatch> {
        let JsonValue::Object(map) = value else {
            return Some(Mismatch {
                rule: rule.name().to_string(),
                message: format!("expected object value, got {}", render(value)),
                actual: Some(value.clone()),
            });
        };

        for (name, ruleset) in fields {
            let field_value = map.get(name);
            if !field_value.is_some_and(is_truthy) && !ruleset.required {
                continue;
            }
            if let Some(mismatch) = self.check(field_value, ruleset) {
                return Some(Mismatch {
                    rule: rule.name().to_string(),
                    message: format!("invalid field \"{}\": {}", name, mismatch.message),
                    actual: mismatch.actual,
                });
            }
        }
        None
    }

    fn coerced<'a>(&self, value: &'a JsonValue) -> Option<&'a str> {
        if self.options.coerce_strings {
            value.as_str()
        } else {
            None
        }
    }
}

/// JS-style truthiness: null, false, 0, 0.0, and "" are falsy; everything
/// else, arrays and objects included, is truthy.
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(flag) => *flag,
        JsonValue::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        JsonValue::String(text) => !text.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Compact rendering of a value for mismatch messages.
fn render(value: &JsonValue) -> String {
    let mut text = value.to_string();
    if text.len() > 48 {
        // back off to a char boundary so multibyte values truncate cleanly
        let mut end = 45;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
        text.push_str("...");
    }
    text
}

/// String form of a scalar candidate, used for coerced enum comparison.
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
