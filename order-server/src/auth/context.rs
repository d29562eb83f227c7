//! Per-request identity context

use shared::models::Role;

/// Identity attached to the current request
///
/// `user_id` is `None` for anonymous callers. The role is only
/// meaningful when a user id is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipContext {
    /// Caller's user id, if authenticated
    pub user_id: Option<i64>,
    /// Caller's role
    pub role: Role,
}

impl OwnershipContext {
    /// Anonymous caller
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            role: Role::Customer,
        }
    }

    /// Authenticated customer
    pub fn customer(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            role: Role::Customer,
        }
    }

    /// Authenticated admin
    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            role: Role::Admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user_id.is_some() && self.role.is_admin()
    }

    /// Actor tag for audit records, e.g. `user:42` or `anonymous`
    pub fn actor(&self) -> String {
        match self.user_id {
            Some(id) if self.role.is_admin() => format!("admin:{id}"),
            Some(id) => format!("user:{id}"),
            None => "anonymous".to_string(),
        }
    }
}

impl Default for OwnershipContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
