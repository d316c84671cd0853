//! Token state machine
//!
//! Pure state machine: receives a token event, returns the next state.
//! The client performs the network call, then swaps in the returned state
//! only if the transition succeeds, so a failed step never leaves a
//! half-updated state behind.

use common::Secret;

use crate::error::{Error, Result};

pub(crate) const REFRESH_REQUIRED: &str = "refresh token must be acquired first";
pub(crate) const ACCESS_REQUIRED: &str = "access token must be acquired first";

/// Tokens held by one client instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenState {
    /// No tokens yet
    #[default]
    Unauthenticated,
    /// Refresh token issued; can request an access token
    Refreshed { refresh_token: Secret<String> },
    /// Both tokens issued; resource calls are allowed
    Authenticated {
        refresh_token: Secret<String>,
        access_token: Secret<String>,
    },
}

/// Outcome of a successful token exchange.
#[derive(Debug)]
pub enum TokenEvent {
    RefreshTokenIssued(Secret<String>),
    AccessTokenIssued(Secret<String>),
}

impl TokenState {
    pub fn refresh_token(&self) -> Option<&Secret<String>> {
        match self {
            TokenState::Unauthenticated => None,
            TokenState::Refreshed { refresh_token }
            | TokenState::Authenticated { refresh_token, .. } => Some(refresh_token),
        }
    }

    pub fn access_token(&self) -> Option<&Secret<String>> {
        match self {
            TokenState::Authenticated { access_token, .. } => Some(access_token),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, TokenState::Authenticated { .. })
    }
}

/// Compute the state that follows `event`. Pure function: no I/O, and the
/// input state is left untouched.
///
/// A new refresh token on an authenticated session keeps the current access
/// token, which stays valid until the caller exchanges the new refresh token.
pub fn handle_event(state: &TokenState, event: TokenEvent) -> Result<TokenState> {
    match (state, event) {
        (
            TokenState::Unauthenticated | TokenState::Refreshed { .. },
            TokenEvent::RefreshTokenIssued(refresh_token),
        ) => Ok(TokenState::Refreshed { refresh_token }),

        (
            TokenState::Authenticated { access_token, .. },
            TokenEvent::RefreshTokenIssued(refresh_token),
        ) => Ok(TokenState::Authenticated {
            refresh_token,
            access_token: access_token.clone(),
        }),

        (TokenState::Unauthenticated, TokenEvent::AccessTokenIssued(_)) => {
            Err(Error::Sequence(REFRESH_REQUIRED))
        }

        (
            TokenState::Refreshed { refresh_token } | TokenState::Authenticated { refresh_token, .. },
            TokenEvent::AccessTokenIssued(access_token),
        ) => Ok(TokenState::Authenticated {
            refresh_token: refresh_token.clone(),
            access_token,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refreshed(rt: &str) -> TokenState {
        TokenState::Refreshed {
            refresh_token: Secret::from(rt),
        }
    }

    fn authenticated(rt: &str, at: &str) -> TokenState {
        TokenState::Authenticated {
            refresh_token: Secret::from(rt),
            access_token: Secret::from(at),
        }
    }

    #[test]
    fn starts_unauthenticated() {
        let state = TokenState::default();
        assert_eq!(state, TokenState::Unauthenticated);
        assert!(state.refresh_token().is_none());
        assert!(state.access_token().is_none());
    }

    #[test]
    fn unauthenticated_to_refreshed() {
        let next = handle_event(
            &TokenState::Unauthenticated,
            TokenEvent::RefreshTokenIssued(Secret::from("R")),
        )
        .unwrap();
        assert_eq!(next, refreshed("R"));
    }

    #[test]
    fn refreshed_to_authenticated() {
        let next = handle_event(
            &refreshed("R"),
            TokenEvent::AccessTokenIssued(Secret::from("A")),
        )
        .unwrap();
        assert_eq!(next, authenticated("R", "A"));
        assert!(next.is_authenticated());
    }

    #[test]
    fn access_before_refresh_is_out_of_sequence() {
        let err = handle_event(
            &TokenState::Unauthenticated,
            TokenEvent::AccessTokenIssued(Secret::from("A")),
        )
        .unwrap_err();
        assert!(
            matches!(err, Error::Sequence(REFRESH_REQUIRED)),
            "got: {err:?}"
        );
    }

    #[test]
    fn new_refresh_token_replaces_old_one() {
        let next = handle_event(
            &refreshed("R1"),
            TokenEvent::RefreshTokenIssued(Secret::from("R2")),
        )
        .unwrap();
        assert_eq!(next, refreshed("R2"));
    }

    #[test]
    fn new_refresh_token_keeps_access_token() {
        let next = handle_event(
            &authenticated("R1", "A1"),
            TokenEvent::RefreshTokenIssued(Secret::from("R2")),
        )
        .unwrap();
        assert_eq!(next, authenticated("R2", "A1"));
    }

    #[test]
    fn new_access_token_replaces_old_one() {
        let next = handle_event(
            &authenticated("R", "A1"),
            TokenEvent::AccessTokenIssued(Secret::from("A2")),
        )
        .unwrap();
        assert_eq!(next, authenticated("R", "A2"));
    }

    #[test]
    fn input_state_is_not_mutated() {
        let state = refreshed("R");
        let _ = handle_event(&state, TokenEvent::AccessTokenIssued(Secret::from("A"))).unwrap();
        assert_eq!(state, refreshed("R"));
    }

    #[test]
    fn debug_never_shows_tokens() {
        let debug = format!("{:?}", authenticated("rt_secret", "at_secret"));
        assert!(!debug.contains("rt_secret"));
        assert!(!debug.contains("at_secret"));
    }
}
