//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Caller role
///
/// `Admin` bypasses ownership scoping; everyone else sees only their
/// own records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = ();

    /// Case-insensitive; unknown values fall back to `Customer`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("admin") {
            Ok(Self::Admin)
        } else {
            Ok(Self::Customer)
        }
    }
}

/// User entity
///
/// Only the fields the admin/customer surfaces need. Credentials and
/// token issuance live in the (stubbed) identity provider, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    /// Unique
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
