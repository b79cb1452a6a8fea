// SPDX-License-Identifier: MIT

//! Synchronous typed event bus. Listeners registered before an `emit` call
//! are invoked in registration order; a listener's failure is logged and
//! swallowed so it never interrupts the scheduler.

use parking_lot::Mutex;
use scanforge_core::Event;
use std::sync::Arc;
use tracing::warn;

type Listener = Box<dyn Fn(&Event) -> Result<(), String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&Event) -> Result<(), String> + Send + Sync + 'static,
    {
        self.listeners.lock().push(Box::new(listener));
    }

    /// Deliver `event` to every listener registered so far, in order.
    /// Listener failures are logged as a warning and never propagate.
    pub fn emit(&self, event: Event) {
        let summary = event.log_summary();
        for listener in self.listeners.lock().iter() {
            if let Err(message) = listener(&event) {
                warn!(event = summary.as_str(), error = message.as_str(), "event listener failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
