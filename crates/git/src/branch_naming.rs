// SPDX-License-Identifier: MIT

//! Job branch name derivation.

const DEFAULT_PREFIX: &str = "scanforge";
const DESCRIPTION_MAX_LEN: usize = 30;

/// `<prefix>/<job_type>-<sanitized-desc>-<epoch>`, sanitizing any character
/// outside `[a-z0-9-]` to `-` and truncating the description to ~30 chars.
pub fn derive_branch_name(job_type: Option<&str>, description: Option<&str>, epoch_ms: i64) -> String {
    let job_type = job_type.filter(|s| !s.is_empty()).unwrap_or("job");
    let sanitized_desc = description.map(sanitize_segment).unwrap_or_default();

    if sanitized_desc.is_empty() {
        format!("{DEFAULT_PREFIX}/{job_type}-{epoch_ms}")
    } else {
        format!("{DEFAULT_PREFIX}/{job_type}-{sanitized_desc}-{epoch_ms}")
    }
}

fn sanitize_segment(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let sanitized: String = lowered
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let truncated = sanitized.chars().take(DESCRIPTION_MAX_LEN).collect::<String>();
    truncated.trim_matches('-').to_string()
}

#[cfg(test)]
#[path = "branch_naming_tests.rs"]
mod tests;
