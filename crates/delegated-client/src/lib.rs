//! X-Booker delegated API client
//!
//! Exchanges delegated-app credentials for a refresh token, the refresh
//! token for an access token, and the access token for authenticated calls
//! against the delegated API. Every response is a `{success, data, message}`
//! envelope; failures surface the server's message as `Error::Api`.
//!
//! Call sequence:
//! 1. Build `Credentials` (validated locally, secret redacted)
//! 2. `DelegatedApiClient::acquire_refresh_token()`
//! 3. `DelegatedApiClient::acquire_access_token()`
//! 4. `DelegatedApiClient::request()` / `get()` as often as needed
//!
//! Steps 2 and 3 can be repeated at any time to renew tokens; the client
//! never does so on its own.

pub mod client;
pub mod constants;
pub mod credentials;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod session;
pub mod transport;

pub use client::DelegatedApiClient;
pub use constants::*;
pub use credentials::Credentials;
pub use endpoints::Endpoints;
pub use envelope::ApiEnvelope;
pub use error::{Error, Result};
pub use reqwest::Method;
pub use session::{TokenEvent, TokenState, handle_event};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
