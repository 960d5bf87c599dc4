use crate::validation::{Mismatch, RuleSpec};
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Identifier carried by every invalid-parameter error.
pub const E_INVALID_PARAMS: &str = "E_INVALID_PARAMS";

/// HTTP status attached to invalid-parameter errors.
pub const INVALID_PARAMS_STATUS: u16 = 400;

/// The one domain error this crate produces: a validation pass found at
/// least one mismatched parameter.
///
/// Constructed exactly once per failed pass, then either surfaced as `Err`
/// or moved into a flash message. The mismatch map is non-empty by
/// construction.
#[derive(Debug, Clone)]
pub struct InvalidParams {
    /// Per-parameter mismatch descriptions, keyed by parameter name.
    pub invalid_params: BTreeMap<String, Mismatch>,
    /// Request URL the parameters were sent to.
    pub route: String,
    /// HTTP verb of the request.
    pub method: String,
    /// The rule specification the parameters were checked against.
    pub usage: RuleSpec,
}

impl InvalidParams {
    pub fn code(&self) -> &'static str {
        E_INVALID_PARAMS
    }

    pub fn status(&self) -> u16 {
        INVALID_PARAMS_STATUS
    }

    /// Machine-readable form, suitable as an API error body.
    pub fn to_json(&self) -> JsonValue {
        let invalid: serde_json::Map<String, JsonValue> = self
            .invalid_params
            .iter()
            .map(|(name, mismatch)| {
                (
                    name.clone(),
                    serde_json::to_value(mismatch).unwrap_or(JsonValue::Null),
                )
            })
            .collect();

        json!({
            "error": self.code(),
            "status": self.status(),
            "route": self.route,
            "method": self.method,
            "usage": self.usage.to_json(),
            "invalidParams": invalid,
        })
    }
}

/// Human-readable form: a header line naming the route, then one `  -> `
/// line per invalid parameter.
impl fmt::Display for InvalidParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid parameters sent to route: \"{} {}\"",
            self.method, self.route
        )?;
        for mismatch in self.invalid_params.values() {
            write!(f, "\n  -> {}", mismatch.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidParams {}

/// Crate-level error enum.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    InvalidParams(#[from] InvalidParams),

    /// A pattern rule failed to compile.
    #[error("PATTERN ERROR: {0}")]
    Pattern(#[from] regex::Error),

    /// A request body could not be parsed into parameters.
    #[error("PARSE ERROR: {message}")]
    Parse { message: String },
}
