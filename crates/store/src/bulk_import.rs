// SPDX-License-Identifier: MIT

//! Bulk import: accepts raw JSON job records using either snake_case or
//! camelCase field names (as produced by an export from either this system
//! or a legacy camelCase one) and normalizes them before insertion.

use crate::error::StoreError;
use scanforge_core::Job;
use serde_json::{Map, Value};

#[derive(Debug, Default, serde::Serialize)]
pub struct BulkImportResult {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Remap every recognized key (snake_case or camelCase) to its canonical
/// snake_case form, dropping keys `Job::canonical_field` doesn't know about.
fn normalize_keys(record: &Value) -> Result<Value, StoreError> {
    let object = record
        .as_object()
        .ok_or_else(|| StoreError::InvalidRecord("record is not a JSON object".to_string()))?;

    let mut normalized = Map::with_capacity(object.len());
    for (key, value) in object {
        if let Some(canonical) = Job::canonical_field(key) {
            normalized.insert(canonical.to_string(), value.clone());
        }
    }
    if !normalized.contains_key("pipeline_id") {
        normalized.insert("pipeline_id".to_string(), Value::String("unknown".to_string()));
    }
    Ok(Value::Object(normalized))
}

/// Parse one raw record into a `Job`, without touching the store.
pub fn parse_record(record: &Value) -> Result<Job, StoreError> {
    let normalized = normalize_keys(record)?;
    if normalized.get("id").and_then(Value::as_str).unwrap_or_default().is_empty() {
        return Err(StoreError::MissingField("id"));
    }
    serde_json::from_value(normalized).map_err(|e| StoreError::InvalidRecord(e.to_string()))
}

#[cfg(test)]
#[path = "bulk_import_tests.rs"]
mod tests;
