//! User roles.
//!
//! Stored as upper-case text in `users.role`; the CHECK constraint in
//! `20250101000001_create_users.sql` must list the same names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_ATTENDANT: &str = "ATTENDANT";
pub const ROLE_USER: &str = "USER";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Attendant,
    #[default]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::Attendant => ROLE_ATTENDANT,
            Self::User => ROLE_USER,
        }
    }

    /// Admins and attendants operate the gates: entries, exits, tickets.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Attendant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Case-insensitive so `"admin"` and `"ADMIN"` both resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_ATTENDANT => Ok(Self::Attendant),
            ROLE_USER => Ok(Self::User),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
