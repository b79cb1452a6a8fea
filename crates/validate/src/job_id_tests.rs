// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn accepts_alphanumeric_with_hyphen_and_underscore() {
    assert!(is_valid_job_id("job-1_abc"));
}

#[test]
fn rejects_empty_string() {
    assert!(!is_valid_job_id(""));
}

#[test]
fn rejects_path_traversal_sequences() {
    assert!(!is_valid_job_id("../../etc/passwd"));
}

#[test]
fn rejects_shell_metacharacters() {
    assert!(!is_valid_job_id("job-1; rm -rf /"));
}

#[test]
fn rejects_length_over_one_hundred() {
    let id = "a".repeat(101);
    assert!(!is_valid_job_id(&id));
}

#[test]
fn accepts_length_exactly_one_hundred() {
    let id = "a".repeat(100);
    assert!(is_valid_job_id(&id));
}
