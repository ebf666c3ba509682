use log::{debug, error, info, warn};

use super::VotingController;
use crate::api::SessionGateway;
use crate::models::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// Status was already terminal; nothing was fetched.
    Skipped,
    /// A new page arrived and its choices are loaded.
    ChoicesReloaded,
    /// A new page arrived but its choices could not be loaded.
    ChoicesFailed,
    /// Same page, still deciding; another check is scheduled.
    Waiting,
    /// Same page, still deciding, and the retry budget is spent.
    LimitReached,
    /// The session reached a result (or an unknown state).
    Settled,
    Expired,
}

impl<G: SessionGateway> VotingController<G> {
    pub async fn refresh_status(&mut self) -> StatusOutcome {
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.current.is_terminal())
        {
            debug!("Session {} already settled", self.session_id);
            return StatusOutcome::Skipped;
        }

        self.loading = true;
        let status = match self.gateway.status(&self.session_id).await {
            Ok(status) => status,
            Err(e) => {
                error!("Failed to refresh status of {}: {}", self.session_id, e);
                self.expire();
                return StatusOutcome::Expired;
            }
        };
        self.timer.cancel();

        let current = status.current;
        let page_id = status.page_id;
        let page_changed = self.last_page_id != Some(page_id);
        self.status = Some(status);

        if page_changed {
            info!("Session {} moved to page {}", self.session_id, page_id);
            self.waiting = false;
            self.refresh_count = 0;
            self.refresh_limit_reached = false;
            self.last_page_id = Some(page_id);
            self.choices.clear();
            self.current = None;
            if current == Status::Deciding {
                return if self.load_choices().await {
                    StatusOutcome::ChoicesReloaded
                } else {
                    StatusOutcome::ChoicesFailed
                };
            }
        } else if current == Status::Deciding {
            self.waiting = true;
            if self.refresh_count >= self.settings.max_refresh_count {
                warn!(
                    "Gave up waiting on session {} after {} checks",
                    self.session_id, self.refresh_count
                );
                self.refresh_limit_reached = true;
                self.loading = false;
                return StatusOutcome::LimitReached;
            }
            self.refresh_count += 1;
            self.timer.schedule(self.settings.interval);
            debug!(
                "Waiting for other voters; next check in {:?}",
                self.settings.interval
            );
            // Loading stays on until a later check brings news.
            return StatusOutcome::Waiting;
        }

        self.waiting = false;
        self.loading = false;
        StatusOutcome::Settled
    }
}
