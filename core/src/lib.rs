//! # paramguard
//!
//! Declarative request-parameter validation for web framework request
//! contexts: check submitted parameters against a rule specification and
//! either surface a structured 400 error or recover into a flash message
//! plus redirect.
//!
//! ```rust
//! use paramguard::{HttpContext, HttpRequest, Rule, RuleSpec, Validate};
//!
//! let mut ctx = HttpContext::from_request(HttpRequest::new("POST", "/signup"));
//! let usage = RuleSpec::new()
//!     .field("email", Rule::Email.required())
//!     .field("age", Rule::Integer);
//!
//! // no redirect target: the error surfaces for the framework handler
//! let result = ctx.validate(&usage, None);
//! assert!(result.is_err());
//! ```

pub mod context;
pub mod errors;
pub mod request;
pub mod validate;
pub mod validation;

pub use context::{FlashMessage, HttpContext, RequestContext};
pub use errors::{InvalidParams, ValidateError, E_INVALID_PARAMS, INVALID_PARAMS_STATUS};
pub use request::{collect_params, HttpRequest, ParamSet, RequestBody};
pub use validate::{validate_params, validate_params_with, Validate};
pub use validation::{is_truthy, MatchOptions, Mismatch, Rule, RuleMatcher, RuleSpec, Ruleset};
