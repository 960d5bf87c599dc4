//! Request context - the surface validation needs from the framework.

use crate::errors::InvalidParams;
use crate::request::{collect_params, HttpRequest, ParamSet};

/// What the validator consumes from a per-request context: a total snapshot
/// of submitted parameters, request metadata, a flash-message sink, and a
/// redirect operation.
pub trait RequestContext {
    /// Total snapshot of all submitted parameters at this moment.
    fn all_params(&self) -> ParamSet;

    fn url(&self) -> &str;

    fn method(&self) -> &str;

    /// Push a transient, redirect-surviving notification. The validator only
    /// ever calls this with level `"error"`.
    fn flash(&mut self, level: &str, error: InvalidParams);

    fn redirect(&mut self, destination: &str);
}

/// One queued flash message.
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub level: String,
    pub error: InvalidParams,
}

/// Concrete per-request context wrapping one `HttpRequest` with a flash
/// queue and a redirect slot. Frameworks with their own context type can
/// implement `RequestContext` directly instead.
#[derive(Debug, Clone)]
pub struct HttpContext {
    request: HttpRequest,
    flashes: Vec<FlashMessage>,
    redirect: Option<String>,
}

impl HttpContext {
    pub fn from_request(request: HttpRequest) -> Self {
        Self {
            request,
            flashes: Vec::new(),
            redirect: None,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Flash messages queued so far, oldest first.
    pub fn flashes(&self) -> &[FlashMessage] {
        &self.flashes
    }

    /// Destination of an issued redirect, if any.
    pub fn redirected_to(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

impl RequestContext for HttpContext {
    fn all_params(&self) -> ParamSet {
        collect_params(&self.request)
    }

    fn url(&self) -> &str {
        &self.request.url
    }

    fn method(&self) -> &str {
        &self.request.method
    }

    fn flash(&mut self, level: &str, error: InvalidParams) {
        self.flashes.push(FlashMessage {
            level: level.to_string(),
            error,
        });
    }

    fn redirect(&mut self, destination: &str) {
        self.redirect = Some(destination.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::RequestBody;
    use serde_json::json;

    #[test]
    fn test_context_exposes_request_metadata() {
        let ctx = HttpContext::from_request(HttpRequest::new("POST", "/signup"));
        assert_eq!(ctx.method(), "POST");
        assert_eq!(ctx.url(), "/signup");
        assert!(ctx.flashes().is_empty());
        assert_eq!(ctx.redirected_to(), None);
    }

    #[test]
    fn test_all_params_snapshots_merged_sources() {
        let mut request = HttpRequest::new("POST", "/signup");
        request.body = RequestBody::Json(json!({"email": "a@example.com"}));
        request.query_params.insert("ref".to_string(), "home".to_string());

        let ctx = HttpContext::from_request(request);
        let params = ctx.all_params();
        assert_eq!(params.get("email"), Some(&json!("a@example.com")));
        assert_eq!(params.get("ref"), Some(&json!("home")));
    }
}
