// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn serializes_with_tagged_type_field() {
    let event = Event::JobStarted { id: "job-1".into(), started_at: Utc::now() };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["type"], "job:started");
    assert_eq!(value["id"], "job-1");
}

#[test]
fn unknown_type_tag_deserializes_to_custom() {
    let raw = serde_json::json!({"type": "something:unheard-of"});
    let event: Event = serde_json::from_value(raw).unwrap();
    assert!(matches!(event, Event::Custom));
}
