// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn missing_values_use_defaults() {
    assert_eq!(parse_pagination(None, None), (DEFAULT_LIMIT, 0));
}

#[test]
fn unparseable_limit_falls_back_to_default() {
    assert_eq!(parse_pagination(Some("not-a-number"), Some("5")), (DEFAULT_LIMIT, 5));
}

#[test]
fn oversized_limit_is_clamped() {
    let (limit, _) = parse_pagination(Some("999999"), None);
    assert_eq!(limit, MAX_LIMIT);
}
