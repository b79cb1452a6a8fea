// SPDX-License-Identifier: MIT

use super::*;
use chrono::Utc;
use parking_lot::Mutex as StdMutex;

#[test]
fn listeners_fire_in_registration_order() {
    let bus = EventBus::new();
    let order = Arc::new(StdMutex::new(Vec::new()));

    let o1 = order.clone();
    bus.subscribe(move |_| {
        o1.lock().push(1);
        Ok(())
    });
    let o2 = order.clone();
    bus.subscribe(move |_| {
        o2.lock().push(2);
        Ok(())
    });

    bus.emit(Event::JobStarted { id: "job-1".into(), started_at: Utc::now() });
    assert_eq!(*order.lock(), vec![1, 2]);
}

#[test]
fn late_subscriber_does_not_see_past_events() {
    let bus = EventBus::new();
    bus.emit(Event::JobStarted { id: "job-1".into(), started_at: Utc::now() });

    let seen = Arc::new(StdMutex::new(0));
    let seen_clone = seen.clone();
    bus.subscribe(move |_| {
        *seen_clone.lock() += 1;
        Ok(())
    });
    assert_eq!(*seen.lock(), 0);
}

#[test]
fn a_failing_listener_does_not_block_the_next_one() {
    let bus = EventBus::new();
    bus.subscribe(|_| Err("boom".to_string()));

    let called = Arc::new(StdMutex::new(false));
    let called_clone = called.clone();
    bus.subscribe(move |_| {
        *called_clone.lock() = true;
        Ok(())
    });

    bus.emit(Event::JobStarted { id: "job-1".into(), started_at: Utc::now() });
    assert!(*called.lock());
}
