// SPDX-License-Identifier: MIT

//! Scan request schema validation.
//!
//! `{repository_path: non-empty string, options?: {force_refresh?: bool,
//! include_tests?: bool, cache_enabled?: bool, max_depth?: int >= 0}}`.
//! Unknown option keys, wrong types, and a negative or non-integer
//! `max_depth` are all rejected.

use crate::error::{FieldError, ValidationErrors};
use serde_json::Value;

const KNOWN_OPTION_KEYS: &[&str] = &["force_refresh", "include_tests", "cache_enabled", "max_depth"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedScanRequest {
    pub repository_path: String,
    pub force_refresh: bool,
    pub include_tests: bool,
    pub cache_enabled: bool,
    pub max_depth: Option<u32>,
}

pub fn validate_scan_request(raw: &Value) -> Result<ValidatedScanRequest, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let repository_path = raw
        .get("repository_path")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());
    if repository_path.is_none() {
        errors.push(FieldError::new(
            "repository_path",
            "repository_path must be a non-empty string",
            "required",
        ));
    }

    let mut request = ValidatedScanRequest {
        repository_path: repository_path.unwrap_or_default().to_string(),
        cache_enabled: true,
        ..Default::default()
    };

    if let Some(options) = raw.get("options") {
        let Some(object) = options.as_object() else {
            errors.push(FieldError::new("options", "options must be an object", "invalid_type"));
            return finish(request, errors);
        };

        for key in object.keys() {
            if !KNOWN_OPTION_KEYS.contains(&key.as_str()) {
                errors.push(FieldError::new(
                    format!("options.{key}"),
                    format!("unknown option `{key}`"),
                    "unknown_field",
                ));
            }
        }

        if let Some(value) = object.get("force_refresh") {
            match value.as_bool() {
                Some(b) => request.force_refresh = b,
                None => errors.push(FieldError::new("options.force_refresh", "must be a boolean", "invalid_type")),
            }
        }
        if let Some(value) = object.get("include_tests") {
            match value.as_bool() {
                Some(b) => request.include_tests = b,
                None => errors.push(FieldError::new("options.include_tests", "must be a boolean", "invalid_type")),
            }
        }
        if let Some(value) = object.get("cache_enabled") {
            match value.as_bool() {
                Some(b) => request.cache_enabled = b,
                None => errors.push(FieldError::new("options.cache_enabled", "must be a boolean", "invalid_type")),
            }
        }
        if let Some(value) = object.get("max_depth") {
            match value.as_i64() {
                Some(n) if n >= 0 => request.max_depth = Some(n as u32),
                _ => errors.push(FieldError::new(
                    "options.max_depth",
                    "must be a non-negative integer",
                    "invalid_value",
                )),
            }
        }
    }

    finish(request, errors)
}

fn finish(request: ValidatedScanRequest, errors: ValidationErrors) -> Result<ValidatedScanRequest, ValidationErrors> {
    if errors.is_empty() {
        Ok(request)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "scan_request_tests.rs"]
mod tests;
