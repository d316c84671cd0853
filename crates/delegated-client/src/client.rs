//! Delegated API client
//!
//! Runs the two-hop token exchange against the auth surface and sends
//! authenticated calls to the delegated surface:
//! 1. `acquire_refresh_token()`: client credentials → refresh token
//! 2. `acquire_access_token()`: refresh token → access token
//! 3. `request()`: access token → resource `data`
//!
//! Each step checks its precondition locally before touching the network.
//! Errors are returned to the caller and never logged here.

use std::sync::Arc;

use common::Secret;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, debug, info_span};

use crate::constants::{ACCESS_TOKEN_PATH, REFRESH_TOKEN_PATH};
use crate::credentials::Credentials;
use crate::endpoints::Endpoints;
use crate::envelope;
use crate::error::{Error, Result};
use crate::session::{ACCESS_REQUIRED, REFRESH_REQUIRED, TokenEvent, TokenState, handle_event};
use crate::transport::{Transport, TransportRequest};

/// `data` of a refresh-token response
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshTokenData {
    refresh_token: String,
}

/// `data` of an access-token response
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenData {
    access_token: String,
}

/// Client for one delegated app.
///
/// Token operations take `&mut self`, so they cannot overlap on one
/// instance. Resource calls take `&self` and may run side by side once the
/// client is authenticated.
pub struct DelegatedApiClient {
    credentials: Credentials,
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    state: TokenState,
}

impl DelegatedApiClient {
    /// Create an unauthenticated client against the production host.
    pub fn new(credentials: Credentials, transport: Arc<dyn Transport>) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            transport,
            state: TokenState::Unauthenticated,
        }
    }

    /// Point the client at a different host (e.g. a local development server).
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Current token state. Tokens stay redacted in its Debug output.
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Exchange the client credentials for a refresh token.
    ///
    /// Sends `organization-id`, `client-id`, and `client-secret` as headers.
    /// May be called again at any time to obtain a fresh refresh token.
    pub async fn acquire_refresh_token(&mut self) -> Result<()> {
        let request = TransportRequest {
            method: Method::GET,
            url: self.endpoints.auth_url(REFRESH_TOKEN_PATH),
            headers: self.credentials.secret_headers()?,
            body: Vec::new(),
        };

        let data: RefreshTokenData = self.send(request).await?;
        let token = sendable_token(data.refresh_token, "refreshToken")?;

        self.state = handle_event(&self.state, TokenEvent::RefreshTokenIssued(token))?;
        debug!(client_id = self.credentials.client_id(), "refresh token acquired");
        Ok(())
    }

    /// Exchange the held refresh token for an access token.
    ///
    /// Fails with `Error::Sequence` without any network call when no refresh
    /// token has been acquired yet.
    pub async fn acquire_access_token(&mut self) -> Result<()> {
        let refresh_token = self
            .state
            .refresh_token()
            .ok_or(Error::Sequence(REFRESH_REQUIRED))?;

        let mut headers = self.credentials.identity_headers()?;
        headers.insert(AUTHORIZATION, bearer(refresh_token)?);

        let request = TransportRequest {
            method: Method::GET,
            url: self.endpoints.auth_url(ACCESS_TOKEN_PATH),
            headers,
            body: Vec::new(),
        };

        let data: AccessTokenData = self.send(request).await?;
        let token = sendable_token(data.access_token, "accessToken")?;

        self.state = handle_event(&self.state, TokenEvent::AccessTokenIssued(token))?;
        debug!(client_id = self.credentials.client_id(), "access token acquired");
        Ok(())
    }

    /// Run both token exchanges in order.
    pub async fn authenticate(&mut self) -> Result<()> {
        self.acquire_refresh_token().await?;
        self.acquire_access_token().await
    }

    /// Send an authenticated call to the delegated surface and decode `data`.
    ///
    /// `path` is appended verbatim to the delegated base URL. A `Some` body is
    /// serialized as JSON; `None`, or a body that serializes to `null`, sends
    /// an empty payload. Only the access token is attached.
    pub async fn request<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let access_token = self
            .state
            .access_token()
            .ok_or(Error::Sequence(ACCESS_REQUIRED))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer(access_token)?);

        let body = match body.map(serde_json::to_value).transpose() {
            Ok(Some(Value::Null)) | Ok(None) => Vec::new(),
            Ok(Some(body)) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                serde_json::to_vec(&body)
                    .map_err(|e| Error::Decode(format!("serializing request body: {e}")))?
            }
            Err(e) => return Err(Error::Decode(format!("serializing request body: {e}"))),
        };

        let request_id = format!("req_{}", uuid::Uuid::new_v4().as_simple());
        let span = info_span!("delegated_request", %request_id, %method, path);

        let request = TransportRequest {
            method,
            url: self.endpoints.api_url(path),
            headers,
            body,
        };

        self.send(request).instrument(span).await
    }

    /// Body-less `GET` on the delegated surface.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        self.request::<(), R>(Method::GET, path, None).await
    }

    async fn send<R: DeserializeOwned>(&self, request: TransportRequest) -> Result<R> {
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "response received");
        envelope::decode(response.status, response.body)
    }
}

fn bearer(token: &Secret<String>) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
        .map_err(|_| Error::Decode("token contains characters not allowed in a header".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Reject tokens that could never be sent back as a bearer header, before
/// they reach the token state.
fn sendable_token(token: String, field: &str) -> Result<Secret<String>> {
    let token = Secret::new(token);
    if token.is_blank() {
        return Err(Error::Decode(format!("`{field}` is empty")));
    }
    bearer(&token)
        .map_err(|_| Error::Decode(format!("`{field}` contains characters not allowed in a header")))?;
    Ok(token)
}
