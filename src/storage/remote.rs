//! Remote wallet API client
//!
//! The [`WalletApi`] trait is the seam between the ledger store and the
//! network; [`HttpWalletApi`] is the reqwest implementation of it.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `POST /login`
//! - `GET /movements`
//! - `POST /movements`
//! - `DELETE /movements/{id}`
//!
//! Authenticated calls carry `Authorization: Bearer <token>` and a `user-id`
//! header.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::models::{Movement, MovementId, Session};

use super::payload::{normalize_login, normalize_movement, normalize_movement_list};

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unauthorized (HTTP {0})")]
    Unauthorized(u16),
    #[error("login response did not include a token")]
    MissingToken,
    #[error("resource not found")]
    NotFound,
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Body of a create request: the movement plus an optional friend to share it with
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementRequest<'a> {
    #[serde(flatten)]
    pub movement: &'a Movement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_email: Option<&'a str>,
}

/// Operations the ledger needs from a remote backing store
pub trait WalletApi {
    /// Exchange credentials for a session
    fn login(&self, email: &str, password: &str) -> Result<Session, RemoteError>;

    /// Fetch the full movement list for the session's user
    fn fetch_movements(&self, session: &Session) -> Result<Vec<Movement>, RemoteError>;

    /// Create a movement; returns the server's copy when it sends one back
    fn create_movement(
        &self,
        session: &Session,
        request: &CreateMovementRequest<'_>,
    ) -> Result<Option<Movement>, RemoteError>;

    /// Delete a movement by id
    fn delete_movement(&self, session: &Session, id: &MovementId) -> Result<(), RemoteError>;
}

/// Blocking HTTP client for the wallet API
pub struct HttpWalletApi {
    base_url: String,
    client: Client,
}

impl HttpWalletApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mywallet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_url(&self) -> String {
        format!("{}/login", self.base_url)
    }

    pub fn movements_url(&self) -> String {
        format!("{}/movements", self.base_url)
    }

    pub fn movement_url(&self, id: &MovementId) -> String {
        format!("{}/movements/{}", self.base_url, id)
    }

    fn authorized(&self, request: RequestBuilder, session: &Session) -> Result<RequestBuilder, RemoteError> {
        let token = session.token.as_deref().ok_or(RemoteError::MissingToken)?;
        Ok(request
            .header("user-id", session.user_id().as_str())
            .bearer_auth(token))
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request
            .send()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RemoteError::Unauthorized(status.as_u16()))
            }
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound),
            s if !s.is_success() => Err(RemoteError::Api(
                s.as_u16(),
                response.text().unwrap_or_default(),
            )),
            _ => Ok(response),
        }
    }

    fn read_json(response: Response) -> Result<Value, RemoteError> {
        response
            .json()
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }
}

impl WalletApi for HttpWalletApi {
    #[instrument(skip(self, password))]
    fn login(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let request = self
            .client
            .post(self.login_url())
            .json(&json!({ "email": email, "password": password }));

        let body = Self::read_json(self.send(request)?)?;
        normalize_login(&body)
    }

    #[instrument(skip_all, fields(user = %session.user_id()))]
    fn fetch_movements(&self, session: &Session) -> Result<Vec<Movement>, RemoteError> {
        let request = self.authorized(self.client.get(self.movements_url()), session)?;
        let body = Self::read_json(self.send(request)?)?;
        let movements = normalize_movement_list(&body)?;
        debug!(count = movements.len(), "Fetched movements");
        Ok(movements)
    }

    #[instrument(skip_all, fields(user = %session.user_id(), id = %request.movement.id))]
    fn create_movement(
        &self,
        session: &Session,
        request: &CreateMovementRequest<'_>,
    ) -> Result<Option<Movement>, RemoteError> {
        let http = self
            .authorized(self.client.post(self.movements_url()), session)?
            .json(request);

        let text = self
            .send(http)?
            .text()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(None);
        }

        // Servers that answer with something other than the movement are fine
        let Ok(body) = serde_json::from_str::<Value>(&text) else {
            return Ok(None);
        };
        let inner = body
            .get("movement")
            .or_else(|| body.get("movimiento"))
            .unwrap_or(&body);
        if inner.get("id").or_else(|| inner.get("_id")).is_none() {
            return Ok(None);
        }
        Ok(normalize_movement(inner))
    }

    #[instrument(skip_all, fields(user = %session.user_id(), id = %id))]
    fn delete_movement(&self, session: &Session, id: &MovementId) -> Result<(), RemoteError> {
        let request = self.authorized(self.client.delete(self.movement_url(id)), session)?;
        self.send(request)?;
        Ok(())
    }
}
