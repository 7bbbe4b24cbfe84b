//! # Roles
//!
//! Platform roles as carried in the `roles` claim.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A platform role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Hackathon participant; may create and join teams
    Participant,
    /// Mentor assigned to teams by an admin
    Mentor,
    /// Back-office administrator
    Admin,
}

impl Role {
    /// The claim value for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Participant => "participant",
            Role::Mentor => "mentor",
            Role::Admin => "admin",
        }
    }

    /// Parse a list of claim values, skipping ones that are not known roles.
    pub fn parse_all<S: AsRef<str>>(values: &[S]) -> Vec<Role> {
        values
            .iter()
            .filter_map(|v| v.as_ref().parse().ok())
            .collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "participant" => Ok(Role::Participant),
            "mentor" => Ok(Role::Mentor),
            "admin" => Ok(Role::Admin),
            other => Err(error::AppError::bad_request(format!("Unknown role: {}", other))),
        }
    }
}
