use thiserror::Error;

use crate::services::auth::claims::ClaimsError;

/// Message returned to clients for every TokenInvalid cause.
pub const TOKEN_INVALID_MESSAGE: &str = "bearer token is not correct";
pub const NOT_ENOUGH_RIGHTS_MESSAGE: &str = "not enough rights";

/// Gate / resolver failures.
///
/// `TokenInvalid` always displays the same message; the concrete cause is only
/// reachable through `reason()` / `source()` and must not be sent to clients.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bearer token is not correct")]
    TokenInvalid(#[source] TokenInvalidReason),
    #[error("not enough rights")]
    NotEnoughRights,
}

#[derive(Debug, Error)]
pub enum TokenInvalidReason {
    #[error("authorization header has {segments} segment(s), expected 2")]
    MalformedHeader { segments: usize },
    #[error(transparent)]
    Verification(#[from] ClaimsError),
    #[error("no identity context on request")]
    MissingIdentity,
    #[error("identity context has no roles")]
    NoRoles,
}

impl AuthError {
    pub fn token_invalid(reason: impl Into<TokenInvalidReason>) -> Self {
        Self::TokenInvalid(reason.into())
    }

    pub fn reason(&self) -> Option<&TokenInvalidReason> {
        match self {
            Self::TokenInvalid(reason) => Some(reason),
            Self::NotEnoughRights => None,
        }
    }
}

impl From<ClaimsError> for AuthError {
    fn from(e: ClaimsError) -> Self {
        Self::token_invalid(e)
    }
}
