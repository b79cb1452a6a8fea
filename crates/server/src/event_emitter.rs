// SPDX-License-Identifier: MIT

//! Pairs the synchronous `EventBus` with the async `Broadcaster` behind one
//! cloneable handle, so the Job Server and any handler it drives (the scan
//! handler's cache hits, for instance) can share a single place to emit
//! through without depending on `JobServer` itself.

use crate::broadcaster::Broadcaster;
use crate::event_bus::EventBus;
use scanforge_core::Event;
use tokio::sync::broadcast;

#[derive(Clone, Default)]
pub struct EventEmitter {
    events: EventBus,
    broadcaster: Broadcaster,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: Event) {
        self.events.emit(event.clone());
        self.broadcaster.mirror(&event);
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Event) -> Result<(), String> + Send + Sync + 'static,
    {
        self.events.subscribe(listener);
    }

    pub fn subscribe_activity(&self) -> broadcast::Receiver<Event> {
        self.broadcaster.subscribe_activity()
    }

    pub fn subscribe_jobs(&self) -> broadcast::Receiver<Event> {
        self.broadcaster.subscribe_jobs()
    }
}

#[cfg(test)]
#[path = "event_emitter_tests.rs"]
mod tests;
