use crate::models::place::PlaceDetails;
use crate::models::status::{Status, StatusObject};

/// `Login -> Deciding -> {Winner, Finished}`, and anything may fall to
/// `Expired`. `Unknown` covers status values this client does not know.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Login,
    Deciding,
    Winner(Option<PlaceDetails>),
    Finished,
    Expired,
    Unknown,
}

impl Phase {
    pub fn derive(has_identity: bool, status: Option<&StatusObject>) -> Self {
        // Expiry is reported even before anyone has logged in.
        if let Some(StatusObject {
            current: Status::Expired,
            ..
        }) = status
        {
            return Phase::Expired;
        }
        if !has_identity {
            return Phase::Login;
        }
        match status {
            None => Phase::Deciding,
            Some(status) => match status.current {
                Status::Deciding => Phase::Deciding,
                Status::Winner => Phase::Winner(status.winner.clone()),
                Status::Finished => Phase::Finished,
                Status::Expired => Phase::Expired,
                Status::Unknown => Phase::Unknown,
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Winner(_) | Phase::Finished | Phase::Expired)
    }
}
