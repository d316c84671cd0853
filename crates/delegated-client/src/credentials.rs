//! Delegated-app credentials
//!
//! The three values identifying a delegated app to the auth surface. They are
//! validated once at construction; an empty value is rejected locally because
//! the remote error for it is far less helpful.

use common::Secret;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::constants::{CLIENT_ID_HEADER, CLIENT_SECRET_HEADER, ORGANIZATION_ID_HEADER};
use crate::error::{Error, Result};

/// Validated, immutable credentials for one delegated app.
#[derive(Debug, Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: Secret<String>,
    organization_id: String,
}

impl Credentials {
    /// Validate and wrap the three credential strings.
    ///
    /// Each value must be non-blank and representable as an HTTP header
    /// value, since all three travel as request headers.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<Secret<String>>,
        organization_id: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            organization_id: organization_id.into(),
        };

        require_header_value("client id", &credentials.client_id)?;
        require_header_value("client secret", credentials.client_secret.expose())?;
        require_header_value("organization id", &credentials.organization_id)?;

        Ok(credentials)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    /// `organization-id` and `client-id`, sent on both token requests.
    pub(crate) fn identity_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ORGANIZATION_ID_HEADER,
            header_value("organization id", &self.organization_id)?,
        );
        headers.insert(CLIENT_ID_HEADER, header_value("client id", &self.client_id)?);
        Ok(headers)
    }

    /// Identity headers plus `client-secret`, for the refresh-token request.
    pub(crate) fn secret_headers(&self) -> Result<HeaderMap> {
        let mut headers = self.identity_headers()?;
        let mut secret = header_value("client secret", self.client_secret.expose())?;
        secret.set_sensitive(true);
        headers.insert(CLIENT_SECRET_HEADER, secret);
        Ok(headers)
    }
}

fn require_header_value(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidCredentials(format!("{name} must not be empty")));
    }
    header_value(name, value).map(drop)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        Error::InvalidCredentials(format!("{name} contains characters not allowed in a header"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_non_empty_values() {
        let credentials = Credentials::new("c1", "s1", "o1").unwrap();
        assert_eq!(credentials.client_id(), "c1");
        assert_eq!(credentials.organization_id(), "o1");
    }

    #[test]
    fn rejects_empty_client_id() {
        let err = Credentials::new("", "s1", "o1").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidCredentials(msg) if msg.contains("client id")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_blank_secret() {
        let err = Credentials::new("c1", "   ", "o1").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidCredentials(msg) if msg.contains("client secret")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_empty_organization_id() {
        let err = Credentials::new("c1", "s1", "").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidCredentials(msg) if msg.contains("organization id")),
            "got: {err:?}"
        );
    }

    #[test]
    fn rejects_values_that_cannot_be_headers() {
        let err = Credentials::new("c1\n", "s1", "o1").unwrap_err();
        assert!(matches!(err, Error::InvalidCredentials(_)), "got: {err:?}");
    }

    #[test]
    fn debug_redacts_secret() {
        let credentials = Credentials::new("c1", "super-secret", "o1").unwrap();
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"), "got: {debug}");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn identity_headers_omit_secret() {
        let credentials = Credentials::new("c1", "s1", "o1").unwrap();
        let headers = credentials.identity_headers().unwrap();
        assert_eq!(headers[ORGANIZATION_ID_HEADER], "o1");
        assert_eq!(headers[CLIENT_ID_HEADER], "c1");
        assert!(!headers.contains_key(CLIENT_SECRET_HEADER));
    }

    #[test]
    fn secret_headers_mark_secret_sensitive() {
        let credentials = Credentials::new("c1", "s1", "o1").unwrap();
        let headers = credentials.secret_headers().unwrap();
        assert_eq!(headers[CLIENT_SECRET_HEADER], "s1");
        assert!(headers[CLIENT_SECRET_HEADER].is_sensitive());
        assert_eq!(headers.len(), 3);
    }
}
