use reqwest::Client;

use super::auth::Credentials;
use super::{endpoint, read_json};
use crate::error::Result;
use crate::models::place::PlaceDetails;
use crate::models::status::StatusObject;

pub async fn get_status(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
) -> Result<StatusObject> {
    let url = endpoint(base_url, &["sessions", session_id, "status"])?;
    let resp = credentials.authorize(client.get(url)).send().await?;
    read_json(resp, "session status").await
}

/// The current page of candidates.
pub async fn get_choices(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
) -> Result<Vec<PlaceDetails>> {
    let url = endpoint(base_url, &["sessions", session_id, "choices"])?;
    let resp = credentials.authorize(client.get(url)).send().await?;
    read_json(resp, "choices").await
}
