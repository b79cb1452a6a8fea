// SPDX-License-Identifier: MIT

use super::*;
use chrono::Utc;

#[tokio::test]
async fn job_events_are_mirrored_to_both_channels() {
    let broadcaster = Broadcaster::new();
    let mut activity_rx = broadcaster.subscribe_activity();
    let mut jobs_rx = broadcaster.subscribe_jobs();

    broadcaster.mirror(&Event::JobStarted { id: "job-1".into(), started_at: Utc::now() });

    assert!(matches!(activity_rx.recv().await.unwrap(), Event::JobStarted { .. }));
    assert!(matches!(jobs_rx.recv().await.unwrap(), Event::JobStarted { .. }));
}

#[tokio::test]
async fn non_job_events_skip_the_jobs_channel() {
    let broadcaster = Broadcaster::new();
    let mut jobs_rx = broadcaster.subscribe_jobs();

    broadcaster.mirror(&Event::CacheHit { repository_path: "/repo".into(), short_commit: "abc".into() });

    assert!(jobs_rx.try_recv().is_err());
}
