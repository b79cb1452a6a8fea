// SPDX-License-Identifier: MIT

//! The scan-result envelope. Opaque to the rest of the system beyond the
//! fields read here: `scan_type`, the metric counts, and `cache_metadata`
//! once a cache hit attaches it.

use scanforge_cache::CacheHitMetadata;
use serde::{Deserialize, Serialize};

pub const HIGH_IMPACT_THRESHOLD: u32 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanType {
    IntraProject,
    InterProject,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::IntraProject => "intra-project",
            ScanType::InterProject => "inter-project",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanMetrics {
    #[serde(default)]
    pub total_duplicate_groups: u64,
    #[serde(default)]
    pub total_cross_repository_groups: u64,
    #[serde(default)]
    pub total_suggestions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub id: String,
    pub impact_score: u32,
    #[serde(default)]
    pub files: Vec<String>,
}

impl DuplicateGroup {
    pub fn is_high_impact(&self) -> bool {
        self.impact_score >= HIGH_IMPACT_THRESHOLD
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub scan_type: ScanType,
    #[serde(default)]
    pub metrics: ScanMetrics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_groups: Vec<DuplicateGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cross_repository_duplicates: Vec<DuplicateGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_metadata: Option<CacheHitMetadata>,
}

impl ScanResult {
    pub fn high_impact_count(&self) -> usize {
        self.duplicate_groups
            .iter()
            .chain(self.cross_repository_duplicates.iter())
            .filter(|g| g.is_high_impact())
            .count()
    }

    pub fn total_duplicates(&self) -> u64 {
        self.metrics.total_duplicate_groups + self.metrics.total_cross_repository_groups
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
