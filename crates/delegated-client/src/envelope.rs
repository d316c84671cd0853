//! Response envelope shared by the auth and delegated surfaces
//!
//! Every response body is `{ "success": bool, "data": ..., "message": ... }`.
//! `success` decides which of `data` and `message` matters; the HTTP status
//! is only consulted when the body is not an envelope at all.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Message reported when a failed envelope carries none.
const MISSING_MESSAGE: &str = "no message provided";

/// Wire shape of every API response.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Split the envelope into its data or an `Api` error.
    pub fn into_result(self, status: u16) -> Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(Error::Api {
                status,
                message: self
                    .message
                    .unwrap_or_else(|| MISSING_MESSAGE.to_string()),
            })
        }
    }
}

/// Interpret a raw response body as an envelope and decode its `data` as `T`.
///
/// A body that is not an envelope is a transport failure; a `data` payload
/// of the wrong shape is a decode failure. An absent `data` decodes from
/// `null`, so `()` and `Option<_>` targets accept it.
pub fn decode<T: DeserializeOwned>(status: u16, body: Value) -> Result<T> {
    let envelope: ApiEnvelope<Value> = serde_json::from_value(body).map_err(|e| {
        if (200..300).contains(&status) {
            Error::Transport(format!("malformed response envelope: {e}"))
        } else {
            Error::Transport(format!("server returned {status} without a response envelope"))
        }
    })?;

    let data = envelope.into_result(status)?.unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|e| Error::Decode(e.to_string()))
}
