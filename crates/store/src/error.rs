// SPDX-License-Identifier: MIT

//! Store-level errors. `bulk_import_jobs` collects these per-record rather
//! than returning early; nothing here aborts a batch import.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record missing required field `{0}`")]
    MissingField(&'static str),

    #[error("job id `{0}` already exists")]
    DuplicateId(String),

    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
