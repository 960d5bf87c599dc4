//! The validation pass and its framework-adapter policy.
//!
//! `validate_params` is the pure core: parameter snapshot and rule spec in,
//! result out, no side effects. The `Validate` extension trait layers the
//! redirect-or-surface policy on top of any `RequestContext`.

use crate::context::RequestContext;
use crate::errors::InvalidParams;
use crate::request::ParamSet;
use crate::validation::{is_truthy, RuleMatcher, RuleSpec};
use log::{debug, warn};
use std::collections::BTreeMap;

/// Check a parameter snapshot against a rule specification.
///
/// A `(key, ruleset)` pair is checked iff the key is present with a truthy
/// value or the ruleset is required. A falsy-but-present value (`0`,
/// `false`, `""`, `null`) on a non-required key is skipped without a check;
/// that policy is deliberate and matches the observable behavior callers
/// depend on. Every checked pair goes through the matcher, absent required
/// values included.
pub fn validate_params(
    params: &ParamSet,
    usage: &RuleSpec,
    route: &str,
    method: &str,
) -> Result<(), InvalidParams> {
    validate_params_with(&RuleMatcher::default(), params, usage, route, method)
}

/// `validate_params` with an explicit matcher, for callers that tune
/// `MatchOptions`.
pub fn validate_params_with(
    matcher: &RuleMatcher,
    params: &ParamSet,
    usage: &RuleSpec,
    route: &str,
    method: &str,
) -> Result<(), InvalidParams> {
    let mut invalid = BTreeMap::new();

    for (key, ruleset) in usage.iter() {
        let value = params.get(key);
        if !value.is_some_and(is_truthy) && !ruleset.required {
            continue;
        }
        if let Some(mismatch) = matcher.check(value, ruleset) {
            invalid.insert(key.clone(), mismatch);
        }
    }

    debug!(
        "checked {} parameter rule(s) for {} {}: {} invalid",
        usage.len(),
        method,
        route,
        invalid.len()
    );

    if invalid.is_empty() {
        return Ok(());
    }

    let error = InvalidParams {
        invalid_params: invalid,
        route: route.to_string(),
        method: method.to_string(),
        usage: usage.clone(),
    };
    warn!("{}", error);
    Err(error)
}

/// Request-level validation, as route handlers call it.
///
/// Blanket-implemented for every `RequestContext`, so `ctx.validate(...)`
/// works on any framework context that implements the trait.
pub trait Validate: RequestContext {
    /// Validate this request's parameters against `usage`.
    ///
    /// On failure with `redirect_to` supplied, the error is recovered
    /// locally: it is flashed under `"error"`, a redirect to the destination
    /// is issued, and the call returns `Ok(())`. Without `redirect_to` the
    /// error is surfaced for the framework's error handler. On success,
    /// nothing happens.
    fn validate(
        &mut self,
        usage: &RuleSpec,
        redirect_to: Option<&str>,
    ) -> Result<(), InvalidParams> {
        match validate_params(&self.all_params(), usage, self.url(), self.method()) {
            Ok(()) => Ok(()),
            Err(error) => match redirect_to {
                Some(destination) => {
                    self.flash("error", error);
                    self.redirect(destination);
                    Ok(())
                }
                None => Err(error),
            },
        }
    }
}

impl<T: RequestContext + ?Sized> Validate for T {}
