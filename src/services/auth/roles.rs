//! Recognized role vocabulary and the role reduction rules.

use std::fmt;
use std::str::FromStr;

use crate::services::auth::error::{AuthError, TokenInvalidReason};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// The only labels accepted as an operative role.
///
/// Variants are declared in ascending privilege order; `Ord` is the ranking
/// used when a caller carries several recognized roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Admin => ROLE_ADMIN,
            Role::SuperAdmin => ROLE_SUPERADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    // Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Reduce an ability list to the single operative role.
///
/// - any label outside the vocabulary fails the whole call with `NotEnoughRights`
/// - an empty list is `TokenInvalid`
/// - otherwise the highest-ranked recognized role wins, independent of order
pub fn resolve_role<S: AsRef<str>>(abilities: &[S]) -> Result<Role, AuthError> {
    let mut resolved: Option<Role> = None;

    for ability in abilities {
        let role = ability
            .as_ref()
            .parse::<Role>()
            .map_err(|_| AuthError::NotEnoughRights)?;
        resolved = resolved.max(Some(role));
    }

    resolved.ok_or(AuthError::token_invalid(TokenInvalidReason::NoRoles))
}

/// `true` iff `role` equals one of `allowed`. No allowed values means no match.
pub fn has_role(role: &str, allowed: &[&str]) -> bool {
    allowed.iter().any(|candidate| *candidate == role)
}
