use crate::models::place::PlaceDetails;
use crate::voting::{Phase, VotingSnapshot};

/// Which screen a session view shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Login,
    Loading,
    Choice(PlaceDetails),
    Waiting,
    RefreshNeeded,
    Winner(Option<PlaceDetails>),
    Finished,
    Expired,
    Error,
}

impl Screen {
    pub fn from_snapshot(snapshot: &VotingSnapshot) -> Self {
        match &snapshot.phase {
            Phase::Login => Screen::Login,
            Phase::Deciding => match &snapshot.current {
                Some(place) => Screen::Choice(place.clone()),
                None if snapshot.refresh_limit_reached => Screen::RefreshNeeded,
                None if snapshot.waiting => Screen::Waiting,
                None if snapshot.loading => Screen::Loading,
                None => Screen::RefreshNeeded,
            },
            Phase::Winner(place) => Screen::Winner(place.clone()),
            Phase::Finished => Screen::Finished,
            Phase::Expired => Screen::Expired,
            Phase::Unknown => Screen::Error,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Enter your phone number to vote",
            Screen::Loading => "Loading choices",
            Screen::Choice(_) => "Would you eat here?",
            Screen::Waiting => "Waiting for other voters",
            Screen::RefreshNeeded => "Please refresh the page",
            Screen::Winner(_) => "The winner is",
            Screen::Finished => "No winner this time",
            Screen::Expired => "Session expired",
            Screen::Error => "An error has occurred",
        }
    }
}
