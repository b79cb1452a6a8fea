// SPDX-License-Identifier: MIT

use super::*;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn emit_reaches_synchronous_listeners() {
    let emitter = EventEmitter::new();
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    emitter.subscribe(move |event| {
        sink.lock().push(event.name().to_string());
        Ok(())
    });

    emitter.emit(Event::JobStarted { id: "job-1".into(), started_at: Utc::now() });
    assert_eq!(seen.lock().as_slice(), ["job:started"]);
}

#[tokio::test]
async fn emit_also_mirrors_onto_broadcast_channels() {
    let emitter = EventEmitter::new();
    let mut activity_rx = emitter.subscribe_activity();

    emitter.emit(Event::CacheHit { repository_path: "/repo".into(), short_commit: "abc".into() });

    assert!(matches!(activity_rx.recv().await.unwrap(), Event::CacheHit { .. }));
}

#[test]
fn clones_share_the_same_listeners_and_channels() {
    let emitter = EventEmitter::new();
    let clone = emitter.clone();
    let seen: Arc<Mutex<usize>> = Arc::new(Mutex::new(0));
    let sink = seen.clone();
    emitter.subscribe(move |_| {
        *sink.lock() += 1;
        Ok(())
    });

    clone.emit(Event::JobStarted { id: "job-1".into(), started_at: Utc::now() });
    assert_eq!(*seen.lock(), 1);
}
