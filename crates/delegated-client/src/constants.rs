//! X-Booker API constants
//!
//! Fixed paths and header names for the two API surfaces. The host is
//! configurable (see `Endpoints`); everything below it is not.

/// Production host for both the auth and the delegated surfaces
pub const DEFAULT_HOST: &str = "https://x-booker.app";

/// Prefix of the authentication surface, relative to the host
pub const AUTH_PREFIX: &str = "/auth/v1";

/// Prefix of the delegated-resource surface, relative to the host
pub const API_PREFIX: &str = "/delegated/v1";

/// Refresh-token resource on the auth surface
pub const REFRESH_TOKEN_PATH: &str = "/tokens/refresh";

/// Access-token resource on the auth surface
pub const ACCESS_TOKEN_PATH: &str = "/tokens/access";

pub const ORGANIZATION_ID_HEADER: &str = "organization-id";
pub const CLIENT_ID_HEADER: &str = "client-id";
pub const CLIENT_SECRET_HEADER: &str = "client-secret";
