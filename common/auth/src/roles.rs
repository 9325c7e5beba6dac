use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Prefix carried by role strings inside tokens and API responses.
pub const AUTHORITY_PREFIX: &str = "ROLE_";

/// Permission tiers. Stored and accepted on input by bare name (`"SELLER"`);
/// rendered as authorities (`"ROLE_SELLER"`) in tokens and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Seller,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Seller];

    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Seller => "SELLER",
        }
    }

    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Seller => "ROLE_SELLER",
        }
    }

    /// Strict parse of the wire form; bare names are rejected.
    pub fn from_authority(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.authority() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.authority())
    }
}

/// Lenient parse used for storage and configuration: accepts `admin`, `ADMIN`
/// and `ROLE_ADMIN` alike.
impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix(AUTHORITY_PREFIX).unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|role| role.name() == bare)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

pub fn authorities(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|role| role.authority().to_string()).collect()
}
