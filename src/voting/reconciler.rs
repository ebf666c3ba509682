use log::{debug, error, warn};

use super::diff::diff;
use super::{Phase, VotingController};
use crate::api::SessionGateway;

impl<G: SessionGateway> VotingController<G> {
    /// Records a vote locally and moves on to the next restaurant.
    pub async fn make_choice(&mut self, name: &str, is_positive: bool) {
        if self.phase() != Phase::Deciding {
            warn!("Ignoring choice for {:?} outside of deciding", name);
            return;
        }
        if self.current.as_ref().map(|place| place.name.as_str()) != Some(name) {
            warn!("Ignoring choice for {:?}, which is not the current restaurant", name);
            return;
        }
        self.decisions.insert(name.to_owned(), is_positive);
        self.next_restaurant().await;
    }

    /// Pushes local changes if there are any, otherwise adopts whatever the
    /// server holds for this voter.
    pub async fn refresh_decisions(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|user| user.user_id().to_owned()) else {
            return;
        };

        let operations = diff(&self.synced_decisions, &self.decisions);
        if operations.is_empty() {
            self.pull_decisions().await;
            return;
        }

        let sent = self.decisions.clone();
        match self
            .gateway
            .patch_decisions(&self.session_id, &user_id, &operations)
            .await
        {
            Ok(_) => {
                debug!("Synced {} decision change(s)", operations.len());
                self.synced_decisions = sent;
                self.error_message = None;
            }
            Err(e) => {
                error!("Failed to save decisions for {}: {}", self.session_id, e);
                self.error_message = Some("Error saving choices, please try again".to_owned());
            }
        }
    }

    pub(super) async fn pull_decisions(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|user| user.user_id().to_owned()) else {
            return;
        };

        match self.gateway.decisions(&self.session_id, &user_id).await {
            Ok(decisions) => {
                self.synced_decisions = decisions.clone();
                self.decisions = decisions;
            }
            Err(e) => {
                error!("Failed to load decisions for {}: {}", self.session_id, e);
                self.error_message = Some("Error fetching choices made so far".to_owned());
            }
        }
    }
}
