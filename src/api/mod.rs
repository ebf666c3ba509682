//! HTTP access to the Choosee API.
//!
//! Each resource module exposes plain async functions taking a
//! [`reqwest::Client`] and the base URL. [`HttpGateway`] bundles those with
//! credentials and implements [`SessionGateway`], the seam the voting
//! controller is written against.

use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::error::{ChooseeError, Result};
use crate::models::decision::DecisionObject;
use crate::models::patch::PatchOperation;
use crate::models::place::{PlaceDetails, PlaceTypeDisplay};
use crate::models::session::{NewSession, SessionData};
use crate::models::status::StatusObject;

pub mod auth;
pub mod decisions;
pub mod places;
pub mod session;
pub mod status;

use auth::Credentials;

/// What the voting controller needs from the server.
#[async_trait]
pub trait SessionGateway: Send + Sync {
    async fn session(&self, session_id: &str) -> Result<SessionData>;

    async fn status(&self, session_id: &str) -> Result<StatusObject>;

    async fn choices(&self, session_id: &str) -> Result<Vec<PlaceDetails>>;

    async fn decisions(&self, session_id: &str, user_id: &str) -> Result<DecisionObject>;

    async fn patch_decisions(
        &self,
        session_id: &str,
        user_id: &str,
        operations: &[PatchOperation],
    ) -> Result<DecisionObject>;
}

#[async_trait]
impl<T: SessionGateway + ?Sized> SessionGateway for std::sync::Arc<T> {
    async fn session(&self, session_id: &str) -> Result<SessionData> {
        (**self).session(session_id).await
    }

    async fn status(&self, session_id: &str) -> Result<StatusObject> {
        (**self).status(session_id).await
    }

    async fn choices(&self, session_id: &str) -> Result<Vec<PlaceDetails>> {
        (**self).choices(session_id).await
    }

    async fn decisions(&self, session_id: &str, user_id: &str) -> Result<DecisionObject> {
        (**self).decisions(session_id, user_id).await
    }

    async fn patch_decisions(
        &self,
        session_id: &str,
        user_id: &str,
        operations: &[PatchOperation],
    ) -> Result<DecisionObject> {
        (**self)
            .patch_decisions(session_id, user_id, operations)
            .await
    }
}

/// `base_url` followed by `segments`, each escaped as a single path segment.
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| ChooseeError::Config(format!("API URL {:?}: {}", base_url, e)))?;
    url.path_segments_mut()
        .map_err(|_| ChooseeError::Config(format!("API URL {:?} cannot take a path", base_url)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
    let status = resp.status();
    let url = resp.url().to_string();
    if status.is_success() {
        let body = resp.json::<T>().await?;
        info!("{} received successfully", what);
        Ok(body)
    } else if status == StatusCode::NOT_FOUND {
        error!("Failed to get {}: not found", what);
        Err(ChooseeError::NotFound(url))
    } else {
        error!("Failed to get {}: {}", what, status);
        Err(ChooseeError::Status { status, url })
    }
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            credentials,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            Credentials {
                id_token: config.id_token.clone(),
                recaptcha_token: config.recaptcha_token.clone(),
            },
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_session(&self, new_session: &NewSession) -> Result<String> {
        session::create_session(&self.client, &self.base_url, &self.credentials, new_session).await
    }

    pub async fn update_session(
        &self,
        session_id: &str,
        operations: &[PatchOperation],
    ) -> Result<SessionData> {
        session::update_session(
            &self.client,
            &self.base_url,
            &self.credentials,
            session_id,
            operations,
        )
        .await
    }

    pub async fn send_text(&self, session_id: &str, voter_id: Option<&str>) -> Result<()> {
        session::send_text(
            &self.client,
            &self.base_url,
            &self.credentials,
            session_id,
            voter_id,
        )
        .await
    }

    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String> {
        places::reverse_geocode(
            &self.client,
            &self.base_url,
            &self.credentials,
            latitude,
            longitude,
        )
        .await
    }

    pub async fn place_types(&self) -> Result<Vec<PlaceTypeDisplay>> {
        places::get_place_types(&self.client, &self.base_url, &self.credentials).await
    }
}

#[async_trait]
impl SessionGateway for HttpGateway {
    async fn session(&self, session_id: &str) -> Result<SessionData> {
        session::get_session(&self.client, &self.base_url, &self.credentials, session_id).await
    }

    async fn status(&self, session_id: &str) -> Result<StatusObject> {
        status::get_status(&self.client, &self.base_url, &self.credentials, session_id).await
    }

    async fn choices(&self, session_id: &str) -> Result<Vec<PlaceDetails>> {
        status::get_choices(&self.client, &self.base_url, &self.credentials, session_id).await
    }

    async fn decisions(&self, session_id: &str, user_id: &str) -> Result<DecisionObject> {
        decisions::get_decisions(
            &self.client,
            &self.base_url,
            &self.credentials,
            session_id,
            user_id,
        )
        .await
    }

    async fn patch_decisions(
        &self,
        session_id: &str,
        user_id: &str,
        operations: &[PatchOperation],
    ) -> Result<DecisionObject> {
        decisions::patch_decisions(
            &self.client,
            &self.base_url,
            &self.credentials,
            session_id,
            user_id,
            operations,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;
    use crate::models::session::RankBy;

    fn anonymous(server: &MockServer) -> HttpGateway {
        HttpGateway::new(
            server.uri(),
            Credentials {
                id_token: None,
                recaptcha_token: Some("captcha-123".to_owned()),
            },
        )
    }

    fn signed_in(server: &MockServer) -> HttpGateway {
        HttpGateway::new(
            format!("{}/", server.uri()),
            Credentials {
                id_token: Some("id-token-abc".to_owned()),
                recaptcha_token: Some("captcha-123".to_owned()),
            },
        )
    }

    #[tokio::test]
    async fn status_is_fetched_from_session_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/aeio/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"current": "deciding", "pageId": 1})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let status = anonymous(&server).status("aeio").await.unwrap();
        assert_eq!(status, StatusObject::deciding(1));
    }

    #[tokio::test]
    async fn choices_are_parsed_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/aeio/choices"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Shakespeare's Pizza - Downtown", "priceLevel": 1, "rating": 4.6},
                {"name": "Flat Branch Pub & Brewing", "vicinity": "115 S 5th St"}
            ])))
            .mount(&server)
            .await;

        let choices = anonymous(&server).choices("aeio").await.unwrap();
        let names: Vec<_> = choices.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            ["Shakespeare's Pizza - Downtown", "Flat Branch Pub & Brewing"]
        );
        assert_eq!(choices[0].price_level, Some(1));
    }

    #[tokio::test]
    async fn decision_patch_sends_operations_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/sessions/aeio/decisions/+15551234567"))
            .and(header("authorization", "Bearer id-token-abc"))
            .and(body_json(json!([
                {"op": "add", "path": "/Booches", "value": true}
            ])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Booches": true})))
            .expect(1)
            .mount(&server)
            .await;

        let ops = vec![PatchOperation::Add {
            path: "/Booches".to_owned(),
            value: json!(true),
        }];
        let updated = signed_in(&server)
            .patch_decisions("aeio", "+15551234567", &ops)
            .await
            .unwrap();
        assert_eq!(updated.get("Booches"), Some(&true));
    }

    #[tokio::test]
    async fn missing_session_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Invalid session"})))
            .mount(&server)
            .await;

        let err = anonymous(&server).session("gone").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn server_error_keeps_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/aeio/decisions/+15551234567"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = anonymous(&server)
            .decisions("aeio", "+15551234567")
            .await
            .unwrap_err();
        match err {
            ChooseeError::Status { status, .. } => assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn anonymous_create_session_sends_recaptcha_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(header("x-recaptcha-token", "captcha-123"))
            .and(body_json(json!({
                "address": "Columbia, MO 65203, USA",
                "radius": 3200,
                "type": "restaurant",
                "rankBy": "prominence",
                "voterCount": 2
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sessionId": "aeio"})))
            .expect(1)
            .mount(&server)
            .await;

        let session_id = anonymous(&server)
            .create_session(&NewSession {
                address: "Columbia, MO 65203, USA".to_owned(),
                radius: 3200,
                place_type: "restaurant".to_owned(),
                rank_by: RankBy::Prominence,
                voter_count: 2,
                expiration: None,
            })
            .await
            .unwrap();
        assert_eq!(session_id, "aeio");
    }

    #[tokio::test]
    async fn authenticated_reverse_geocode_uses_authed_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse-geocode/authed"))
            .and(query_param("latitude", "38.9517"))
            .and(query_param("longitude", "-92.3341"))
            .and(header("authorization", "Bearer id-token-abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"address": "Columbia, MO 65201, USA"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let address = signed_in(&server)
            .reverse_geocode(38.9517, -92.3341)
            .await
            .unwrap();
        assert_eq!(address, "Columbia, MO 65201, USA");
    }

    #[tokio::test]
    async fn anonymous_reverse_geocode_uses_guarded_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse-geocode"))
            .and(header("x-recaptcha-token", "captcha-123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"address": "Columbia, MO 65201, USA"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let address = anonymous(&server)
            .reverse_geocode(38.9517, -92.3341)
            .await
            .unwrap();
        assert_eq!(address, "Columbia, MO 65201, USA");
    }

    #[tokio::test]
    async fn send_text_targets_single_voter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sessions/aeio/send-text/+15551234567"))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        signed_in(&server)
            .send_text("aeio", Some("+15551234567"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn session_update_returns_new_session() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/sessions/aeio"))
            .and(body_json(json!([{"op": "replace", "path": "/voterCount", "value": 4}])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sessionId": "aeio",
                "address": "Columbia, MO 65203, USA",
                "status": {"current": "deciding", "pageId": 1},
                "voterCount": 4
            })))
            .mount(&server)
            .await;

        let session = signed_in(&server)
            .update_session(
                "aeio",
                &[PatchOperation::Replace {
                    path: "/voterCount".to_owned(),
                    value: json!(4),
                }],
            )
            .await
            .unwrap();
        assert_eq!(session.voter_count, 4);
        assert_eq!(session.status.current, "deciding");
    }

    #[tokio::test]
    async fn place_types_are_listed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/places/types"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"display": "Restaurant", "value": "restaurant", "canBeDefault": true},
                {"display": "Bar", "value": "bar"}
            ])))
            .mount(&server)
            .await;

        let types = anonymous(&server).place_types().await.unwrap();
        assert_eq!(types.len(), 2);
        assert!(types[0].can_be_default);
        assert!(!types[1].can_be_default);
    }

    #[test]
    fn endpoint_escapes_each_segment() {
        let url = endpoint("https://api.example.test/v1", &["sessions", "a/b?c#d", "status"]).unwrap();
        assert_eq!(url.path(), "/v1/sessions/a%2Fb%3Fc%23d/status");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[tokio::test]
    async fn session_id_with_slash_stays_in_one_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sessions/ae%2Fio/status"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"current": "finished", "pageId": 3})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let status = anonymous(&server).status("ae/io").await.unwrap();
        assert_eq!(status.page_id, 3);
    }
}
