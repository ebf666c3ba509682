use log::{error, info};

use super::{StatusOutcome, VotingController};
use crate::api::SessionGateway;
use crate::models::decision::DecisionObject;
use crate::models::place::PlaceDetails;

/// Index of the first choice the voter has not decided on yet.
pub fn find_next_restaurant<'a, I>(choices: I, decisions: &DecisionObject) -> Option<usize>
where
    I: IntoIterator<Item = &'a PlaceDetails>,
{
    choices
        .into_iter()
        .position(|choice| !decisions.contains_key(&choice.name))
}

impl<G: SessionGateway> VotingController<G> {
    /// Presents the next undecided restaurant. At the end of the page the
    /// decisions are synced and the status is checked for a new page.
    pub async fn next_restaurant(&mut self) {
        if let Some(current) = self.current.take() {
            if !self.decisions.contains_key(&current.name) {
                self.choices.push_front(current);
            }
        }

        loop {
            if let Some(index) = find_next_restaurant(&self.choices, &self.decisions) {
                self.choices.drain(..index);
                self.current = self.choices.pop_front();
                self.loading = false;
                return;
            }

            self.choices.clear();
            self.refresh_decisions().await;
            if self.refresh_status().await != StatusOutcome::ChoicesReloaded {
                return;
            }
        }
    }

    pub(super) async fn load_choices(&mut self) -> bool {
        match self.gateway.choices(&self.session_id).await {
            Ok(choices) => {
                info!(
                    "Loaded {} choice(s) for session {}",
                    choices.len(),
                    self.session_id
                );
                self.choices = choices.into();
                self.error_message = None;
                true
            }
            Err(e) => {
                error!("Failed to load choices for {}: {}", self.session_id, e);
                // Forget the page so the next status check fetches it again.
                self.last_page_id = None;
                self.loading = false;
                self.error_message =
                    Some("Error fetching choices, please refresh the page to try again".to_owned());
                false
            }
        }
    }
}
