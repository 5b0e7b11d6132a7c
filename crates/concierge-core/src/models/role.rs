use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BoundaryError;

/// Caller role, supplied by an already-authenticated front end.
///
/// The pipeline never infers or upgrades a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "traveler")]
    Consumer,
    #[serde(alias = "partner")]
    Provider,
    #[serde(alias = "admin")]
    Administrator,
}

impl Role {
    pub const ALL: [Role; 3] = [Self::Consumer, Self::Provider, Self::Administrator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consumer => "consumer",
            Self::Provider => "provider",
            Self::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = BoundaryError;

    /// Case-insensitive; accepts the legacy marketplace names too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consumer" | "traveler" => Ok(Self::Consumer),
            "provider" | "partner" => Ok(Self::Provider),
            "administrator" | "admin" => Ok(Self::Administrator),
            _ => Err(BoundaryError::InvalidRole {
                value: s.to_string(),
            }),
        }
    }
}
