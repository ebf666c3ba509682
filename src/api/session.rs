use log::{debug, error, info};
use reqwest::Client;

use super::auth::Credentials;
use super::{endpoint, read_json};
use crate::error::{ChooseeError, Result};
use crate::models::patch::PatchOperation;
use crate::models::session::{NewSession, SessionCreated, SessionData};

pub async fn get_session(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
) -> Result<SessionData> {
    let url = endpoint(base_url, &["sessions", session_id])?;
    let resp = credentials.authorize(client.get(url)).send().await?;
    read_json(resp, "session").await
}

pub async fn create_session(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    new_session: &NewSession,
) -> Result<String> {
    debug!("Creating session near {}", new_session.address);
    let url = endpoint(base_url, &["sessions"])?;
    let resp = credentials
        .guard(client.post(url))
        .json(new_session)
        .send()
        .await?;
    let created: SessionCreated = read_json(resp, "new session").await?;
    info!("Session {} created", created.session_id);
    Ok(created.session_id)
}

pub async fn update_session(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
    operations: &[PatchOperation],
) -> Result<SessionData> {
    let url = endpoint(base_url, &["sessions", session_id])?;
    let resp = credentials
        .authorize(client.patch(url))
        .json(operations)
        .send()
        .await?;
    read_json(resp, "updated session").await
}

/// Texts the session link to every voter, or to `voter_id` only.
pub async fn send_text(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    session_id: &str,
    voter_id: Option<&str>,
) -> Result<()> {
    let url = match voter_id {
        Some(voter) => endpoint(base_url, &["sessions", session_id, "send-text", voter])?,
        None => endpoint(base_url, &["sessions", session_id, "send-text"])?,
    };
    let resp = credentials
        .authorize(client.post(url.clone()))
        .json(&serde_json::json!({}))
        .send()
        .await?;

    let status = resp.status();
    if status.is_success() {
        info!("Text sent for session {}", session_id);
        Ok(())
    } else {
        error!("Failed to send text for session {}: {}", session_id, status);
        Err(ChooseeError::Status {
            status,
            url: url.to_string(),
        })
    }
}
