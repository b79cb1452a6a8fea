// SPDX-License-Identifier: MIT

//! Mirrors events onto named broadcast channels (`activity`, `jobs`) for
//! async consumers (dashboards, websockets), independent of the
//! synchronous `EventBus` listeners the scheduler itself drives.

use scanforge_core::Event;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct Broadcaster {
    activity: broadcast::Sender<Event>,
    jobs: broadcast::Sender<Event>,
}

impl Broadcaster {
    pub fn new() -> Self {
        let (activity, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (jobs, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { activity, jobs }
    }

    pub fn subscribe_activity(&self) -> broadcast::Receiver<Event> {
        self.activity.subscribe()
    }

    pub fn subscribe_jobs(&self) -> broadcast::Receiver<Event> {
        self.jobs.subscribe()
    }

    /// Mirror `event` onto `activity` always, and onto `jobs` when it's a
    /// job lifecycle event. A channel with no receivers simply drops the
    /// send — broadcast channels never block or error on that.
    pub fn mirror(&self, event: &Event) {
        let _ = self.activity.send(event.clone());
        if event.job_id().is_some() {
            let _ = self.jobs.send(event.clone());
        }
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "broadcaster_tests.rs"]
mod tests;
