// SPDX-License-Identifier: MIT

use super::super::Event;
use chrono::Utc;

#[test]
fn job_id_extracts_from_lifecycle_events() {
    let event = Event::JobCompleted { id: "job-1".into(), completed_at: Utc::now(), result: None };
    assert_eq!(event.job_id(), Some("job-1"));
}

#[test]
fn job_id_is_none_for_cache_events() {
    let event = Event::CacheMiss { repository_path: "/repo".into(), short_commit: "abc1234".into() };
    assert_eq!(event.job_id(), None);
}
