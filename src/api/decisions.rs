use log::debug;
use reqwest::Client;

use super::auth::Credentials;
use super::{endpoint, read_json};
use crate::error::Result;
use crate::models::decision::DecisionObject;
use crate::models::patch::PatchOperation;

pub async fn get_decisions(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
    user_id: &str,
) -> Result<DecisionObject> {
    let url = endpoint(base_url, &["sessions", session_id, "decisions", user_id])?;
    let resp = credentials.authorize(client.get(url)).send().await?;
    read_json(resp, "decisions").await
}

pub async fn patch_decisions(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
    user_id: &str,
    operations: &[PatchOperation],
) -> Result<DecisionObject> {
    debug!("Sending {} decision change(s)", operations.len());
    let url = endpoint(base_url, &["sessions", session_id, "decisions", user_id])?;
    let resp = credentials
        .authorize(client.patch(url))
        .json(operations)
        .send()
        .await?;
    read_json(resp, "updated decisions").await
}
