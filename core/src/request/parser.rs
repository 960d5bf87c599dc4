use crate::errors::ValidateError;
use crate::request::types::{HttpRequest, ParamSet, RequestBody};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| {
            let mut parts = pair.split('=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) => Some((
                    urlencoding::decode(key).ok()?.into_owned(),
                    urlencoding::decode(value).ok()?.into_owned(),
                )),
                _ => None,
            }
        })
        .collect()
}

pub fn parse_json_body(data: &[u8]) -> Result<JsonValue, ValidateError> {
    serde_json::from_slice(data).map_err(|e| ValidateError::Parse {
        message: format!("Invalid JSON body: {}", e),
    })
}

pub fn parse_form_body(data: &[u8]) -> Result<HashMap<String, String>, ValidateError> {
    let body_str = std::str::from_utf8(data).map_err(|e| ValidateError::Parse {
        message: format!("Invalid UTF-8 in form body: {}", e),
    })?;

    Ok(parse_query_string(body_str))
}

/// Merge body fields, query parameters, and route parameters into one flat
/// snapshot. Later sources win: route over query, query over body. JSON-body
/// values keep their types; query, form, and route values are strings.
/// Non-object JSON bodies and raw bodies contribute no named parameters.
pub fn collect_params(request: &HttpRequest) -> ParamSet {
    let mut params = ParamSet::new();

    match &request.body {
        RequestBody::Json(JsonValue::Object(fields)) => {
            for (name, value) in fields {
                params.insert(name.clone(), value.clone());
            }
        }
        RequestBody::Form(fields) => {
            for (name, value) in fields {
                params.insert(name.clone(), value.clone());
            }
        }
        RequestBody::Json(_) | RequestBody::Raw(_) | RequestBody::Empty => {}
    }

    for (name, value) in &request.query_params {
        params.insert(name.clone(), value.clone());
    }
    for (name, value) in &request.path_params {
        params.insert(name.clone(), value.clone());
    }

    params
}
