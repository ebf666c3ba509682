use std::time::Duration;

use tokio::time::Instant;

/// The one pending status re-poll. Scheduling replaces whatever was pending.
#[derive(Debug, Default)]
pub(crate) struct PollTimer {
    deadline: Option<Instant>,
}

impl PollTimer {
    pub(crate) fn schedule(&mut self, delay: Duration) {
        self.deadline = Some(Instant::now() + delay);
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
