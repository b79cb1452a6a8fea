// SPDX-License-Identifier: MIT

crate::define_id! {
    pub struct TestId("tst-");
}

#[test]
fn round_trips_through_string() {
    let id = TestId::new();
    let s = id.to_string();
    let parsed = TestId::from_string(&s);
    assert_eq!(id, parsed);
}

#[test]
fn suffix_strips_prefix() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn distinct_ids_are_not_equal() {
    assert_ne!(TestId::new(), TestId::new());
}
