//! Client-side voting session controller.
//!
//! The controller walks the current page of choices, records yes/no
//! decisions locally and keeps the server in step at page boundaries. While
//! other voters are still deciding it re-polls the session status on a single
//! timer until the server moves to a new page or settles on a result.
//!
//! All state lives in [`VotingController`]. It is driven either directly (in
//! tests) or by the task started with [`task::spawn_controller`].

use std::collections::VecDeque;
use std::time::Duration;

use log::{error, info, warn};
use tokio::time::Instant;

use crate::api::SessionGateway;
use crate::config::AppConfig;
use crate::models::decision::DecisionObject;
use crate::models::place::PlaceDetails;
use crate::models::status::StatusObject;
use crate::models::user::LoggedInUser;

pub mod cursor;
pub mod diff;
pub mod phase;
mod poller;
mod reconciler;
pub mod task;
mod timer;

#[cfg(test)]
mod testing;

pub use phase::Phase;
pub use poller::StatusOutcome;
use timer::PollTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_refresh_count: u32,
}

impl From<&AppConfig> for PollSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_refresh_count: config.max_refresh_count,
        }
    }
}

/// What the UI needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VotingSnapshot {
    pub phase: Phase,
    pub address: Option<String>,
    pub current: Option<PlaceDetails>,
    pub waiting: bool,
    pub loading: bool,
    pub refresh_limit_reached: bool,
    pub error_message: Option<String>,
}

pub struct VotingController<G> {
    gateway: G,
    session_id: String,
    settings: PollSettings,
    user: Option<LoggedInUser>,
    address: Option<String>,
    status: Option<StatusObject>,
    last_page_id: Option<u64>,
    choices: VecDeque<PlaceDetails>,
    current: Option<PlaceDetails>,
    decisions: DecisionObject,
    synced_decisions: DecisionObject,
    waiting: bool,
    loading: bool,
    refresh_count: u32,
    refresh_limit_reached: bool,
    error_message: Option<String>,
    timer: PollTimer,
}

impl<G: SessionGateway> VotingController<G> {
    pub fn new(gateway: G, session_id: impl Into<String>, settings: PollSettings) -> Self {
        Self {
            gateway,
            session_id: session_id.into(),
            settings,
            user: None,
            address: None,
            status: None,
            last_page_id: None,
            choices: VecDeque::new(),
            current: None,
            decisions: DecisionObject::new(),
            synced_decisions: DecisionObject::new(),
            waiting: false,
            loading: false,
            refresh_count: 0,
            refresh_limit_reached: false,
            error_message: None,
            timer: PollTimer::default(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn phase(&self) -> Phase {
        Phase::derive(self.user.is_some(), self.status.as_ref())
    }

    pub fn current(&self) -> Option<&PlaceDetails> {
        self.current.as_ref()
    }

    pub fn decisions(&self) -> &DecisionObject {
        &self.decisions
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn poll_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn snapshot(&self) -> VotingSnapshot {
        VotingSnapshot {
            phase: self.phase(),
            address: self.address.clone(),
            current: self.current.clone(),
            waiting: self.waiting,
            loading: self.loading,
            refresh_limit_reached: self.refresh_limit_reached,
            error_message: self.error_message.clone(),
        }
    }

    /// Identity acquired: load the session, this voter's decisions and the
    /// first page of choices.
    pub async fn login(&mut self, user: LoggedInUser) {
        if self.user.is_some() {
            warn!("Already voting in session {}", self.session_id);
            return;
        }
        info!("Voting in session {} as {}", self.session_id, user.user_id());
        self.user = Some(user);
        self.loading = true;

        match self.gateway.session(&self.session_id).await {
            Ok(session) => self.address = Some(session.address),
            Err(e) if e.is_not_found() => {
                warn!("Session {} does not exist", self.session_id);
                self.expire();
                return;
            }
            Err(e) => error!("Failed to load session {}: {}", self.session_id, e),
        }

        self.pull_decisions().await;
        if self.refresh_status().await == StatusOutcome::ChoicesReloaded {
            self.next_restaurant().await;
        }
    }

    /// Fired when the scheduled status check comes due.
    pub async fn on_poll_timer(&mut self) {
        self.timer.cancel();
        if self.refresh_status().await == StatusOutcome::ChoicesReloaded {
            self.next_restaurant().await;
        }
    }

    /// Manual retry, offered once automatic polling has given up.
    pub async fn refresh(&mut self) {
        if self.phase() != Phase::Deciding {
            return;
        }
        self.refresh_count = 0;
        self.refresh_limit_reached = false;
        self.error_message = None;
        self.next_restaurant().await;
    }

    fn expire(&mut self) {
        self.status = Some(StatusObject::expired());
        self.timer.cancel();
        self.loading = false;
        self.waiting = false;
        self.current = None;
        self.choices.clear();
    }
}
