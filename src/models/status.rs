use serde::{Deserialize, Serialize};

use super::place::PlaceDetails;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Deciding,
    Winner,
    Finished,
    Expired,
    #[serde(other)]
    Unknown,
}

impl Status {
    /// No status poll ever leaves these.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Winner | Status::Finished | Status::Expired)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StatusObject {
    pub current: Status,
    #[serde(rename = "pageId", default)]
    pub page_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlaceDetails>,
}

impl StatusObject {
    /// Stand-in used when the status can no longer be fetched.
    pub fn expired() -> Self {
        Self {
            current: Status::Expired,
            page_id: 0,
            winner: None,
        }
    }

    pub fn deciding(page_id: u64) -> Self {
        Self {
            current: Status::Deciding,
            page_id,
            winner: None,
        }
    }
}
