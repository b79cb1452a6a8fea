// SPDX-License-Identifier: MIT

//! scanforge-store: durable job persistence, independent of the Job
//! Server's in-memory scheduling state.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod bulk_import;
mod error;
mod pagination;
mod store;

pub use bulk_import::{parse_record, BulkImportResult};
pub use error::StoreError;
pub use pagination::{sanitize as sanitize_pagination, DEFAULT_LIMIT, MAX_LIMIT};
pub use store::JobStore;
