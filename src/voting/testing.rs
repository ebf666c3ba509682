use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Notify;

use super::PollSettings;
use super::diff::apply_patch;
use crate::api::SessionGateway;
use crate::error::{ChooseeError, Result};
use crate::models::decision::DecisionObject;
use crate::models::patch::PatchOperation;
use crate::models::place::PlaceDetails;
use crate::models::session::{SessionData, SessionStatusSummary};
use crate::models::status::StatusObject;

pub(crate) fn place(name: &str) -> PlaceDetails {
    PlaceDetails {
        name: name.to_owned(),
        ..Default::default()
    }
}

pub(crate) fn settings() -> PollSettings {
    PollSettings {
        interval: Duration::from_secs(15),
        max_refresh_count: 20,
    }
}

fn server_error(what: &str) -> ChooseeError {
    ChooseeError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        url: format!("fake://{}", what),
    }
}

#[derive(Default)]
struct FakeState {
    session_missing: bool,
    status: Option<StatusObject>,
    pages: HashMap<u64, Vec<PlaceDetails>>,
    choices_failing: bool,
    decisions: DecisionObject,
    patch_failing: bool,
    status_hold: Option<Arc<Notify>>,
    calls: Vec<String>,
}

/// In-memory stand-in for the API, holding one session and one voter.
#[derive(Default)]
pub(crate) struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub(crate) fn deciding(page_id: u64, choices: Vec<PlaceDetails>) -> Self {
        let gateway = Self::default();
        gateway.set_status(Some(StatusObject::deciding(page_id)));
        gateway.set_choices(page_id, choices);
        gateway
    }

    fn with<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// `None` makes status requests fail.
    pub(crate) fn set_status(&self, status: Option<StatusObject>) {
        self.with(|s| s.status = status);
    }

    pub(crate) fn set_choices(&self, page_id: u64, choices: Vec<PlaceDetails>) {
        self.with(|s| s.pages.insert(page_id, choices));
    }

    pub(crate) fn set_choices_failing(&self, failing: bool) {
        self.with(|s| s.choices_failing = failing);
    }

    pub(crate) fn set_decisions(&self, decisions: DecisionObject) {
        self.with(|s| s.decisions = decisions);
    }

    pub(crate) fn set_patch_failing(&self, failing: bool) {
        self.with(|s| s.patch_failing = failing);
    }

    /// Status requests wait for one `notify_one` on `hold` before answering.
    pub(crate) fn hold_status(&self, hold: Arc<Notify>) {
        self.with(|s| s.status_hold = Some(hold));
    }

    pub(crate) fn set_session_missing(&self) {
        self.with(|s| s.session_missing = true);
    }

    pub(crate) fn server_decisions(&self) -> DecisionObject {
        self.with(|s| s.decisions.clone())
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.with(|s| s.calls.clone())
    }

    pub(crate) fn clear_calls(&self) {
        self.with(|s| s.calls.clear());
    }
}

#[async_trait]
impl SessionGateway for FakeGateway {
    async fn session(&self, session_id: &str) -> Result<SessionData> {
        self.with(|s| {
            s.calls.push("GET session".to_owned());
            if s.session_missing {
                return Err(ChooseeError::NotFound(format!("fake://sessions/{}", session_id)));
            }
            Ok(SessionData {
                session_id: session_id.to_owned(),
                address: "Columbia, MO 65203, USA".to_owned(),
                status: SessionStatusSummary {
                    current: "deciding".to_owned(),
                    page_id: s.status.as_ref().map_or(0, |status| status.page_id),
                },
                voter_count: 2,
                owner: None,
                radius: Some(3200),
                place_type: Some("restaurant".to_owned()),
                rank_by: None,
                expiration: None,
            })
        })
    }

    async fn status(&self, _session_id: &str) -> Result<StatusObject> {
        let hold = self.with(|s| s.status_hold.take());
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.with(|s| {
            s.calls.push("GET status".to_owned());
            s.status.clone().ok_or_else(|| server_error("status"))
        })
    }

    async fn choices(&self, _session_id: &str) -> Result<Vec<PlaceDetails>> {
        self.with(|s| {
            s.calls.push("GET choices".to_owned());
            if s.choices_failing {
                return Err(server_error("choices"));
            }
            let page_id = s.status.as_ref().map_or(0, |status| status.page_id);
            Ok(s.pages.get(&page_id).cloned().unwrap_or_default())
        })
    }

    async fn decisions(&self, _session_id: &str, _user_id: &str) -> Result<DecisionObject> {
        self.with(|s| {
            s.calls.push("GET decisions".to_owned());
            Ok(s.decisions.clone())
        })
    }

    async fn patch_decisions(
        &self,
        _session_id: &str,
        _user_id: &str,
        operations: &[PatchOperation],
    ) -> Result<DecisionObject> {
        self.with(|s| {
            s.calls.push("PATCH decisions".to_owned());
            if s.patch_failing {
                return Err(server_error("decisions"));
            }
            s.decisions = apply_patch(&s.decisions, operations)?;
            Ok(s.decisions.clone())
        })
    }
}
