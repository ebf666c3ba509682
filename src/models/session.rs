use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patch::PatchOperation;
use crate::error::{ChooseeError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankBy {
    Distance,
    #[default]
    Prominence,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionStatusSummary {
    pub current: String,
    #[serde(rename = "pageId")]
    pub page_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionData {
    #[serde(rename = "sessionId", default)]
    pub session_id: String,
    pub address: String,
    pub status: SessionStatusSummary,
    #[serde(rename = "voterCount")]
    pub voter_count: u32,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(rename = "type", default)]
    pub place_type: Option<String>,
    #[serde(rename = "rankBy", default)]
    pub rank_by: Option<RankBy>,
    #[serde(default)]
    pub expiration: Option<u64>,
}

/// Body of `POST /sessions`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub address: String,
    /// Search radius in meters.
    pub radius: u32,
    #[serde(rename = "type")]
    pub place_type: String,
    pub rank_by: RankBy,
    pub voter_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SessionCreated {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

const METERS_PER_MILE: f64 = 1609.34;
const MAX_RADIUS_MILES: f64 = 30.0;
const MAX_VOTERS: u32 = 10;

fn radius_meters(radius_miles: f64) -> Result<u32> {
    if !(1.0..=MAX_RADIUS_MILES).contains(&radius_miles) {
        return Err(ChooseeError::InvalidInput(format!(
            "Radius must be between 1 and {} miles",
            MAX_RADIUS_MILES
        )));
    }
    Ok((radius_miles * METERS_PER_MILE).round() as u32)
}

fn checked_voter_count(voter_count: u32) -> Result<u32> {
    if voter_count == 0 || voter_count > MAX_VOTERS {
        return Err(ChooseeError::InvalidInput(format!(
            "Voter count must be between 1 and {}",
            MAX_VOTERS
        )));
    }
    Ok(voter_count)
}

impl NewSession {
    /// Validates what a user typed into the new-session form.
    pub fn from_form(
        address: &str,
        radius_miles: f64,
        place_type: &str,
        rank_by: RankBy,
        voter_count: u32,
    ) -> Result<Self> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ChooseeError::InvalidInput("Address is required".to_owned()));
        }
        let place_type = place_type.trim();
        if place_type.is_empty() {
            return Err(ChooseeError::InvalidInput("Choose a place type".to_owned()));
        }

        Ok(Self {
            address: address.to_owned(),
            radius: radius_meters(radius_miles)?,
            place_type: place_type.to_owned(),
            rank_by,
            voter_count: checked_voter_count(voter_count)?,
            expiration: None,
        })
    }
}

/// Owner edits to a running session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionEdits {
    pub address: Option<String>,
    pub radius_miles: Option<f64>,
    pub voter_count: Option<u32>,
}

impl SessionEdits {
    pub fn into_operations(self) -> Result<Vec<PatchOperation>> {
        let mut operations = Vec::new();
        if let Some(address) = self.address {
            let address = address.trim();
            if address.is_empty() {
                return Err(ChooseeError::InvalidInput("Address is required".to_owned()));
            }
            operations.push(PatchOperation::Replace {
                path: "/address".to_owned(),
                value: Value::from(address),
            });
        }
        if let Some(radius_miles) = self.radius_miles {
            operations.push(PatchOperation::Replace {
                path: "/radius".to_owned(),
                value: Value::from(radius_meters(radius_miles)?),
            });
        }
        if let Some(voter_count) = self.voter_count {
            operations.push(PatchOperation::Replace {
                path: "/voterCount".to_owned(),
                value: Value::from(checked_voter_count(voter_count)?),
            });
        }
        if operations.is_empty() {
            return Err(ChooseeError::InvalidInput("Nothing to update".to_owned()));
        }
        Ok(operations)
    }
}
