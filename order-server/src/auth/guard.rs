//! Ownership guard
//!
//! Central decision point for scoped data access. Handlers never
//! compare owner ids themselves: they either ask for a [`ScopeFilter`]
//! to narrow a listing, or pass a loaded record through
//! [`OwnershipGuard::authorize_single`] before returning or mutating it.

use shared::{AppError, AppResult};

use crate::security_log;

use super::OwnershipContext;

/// Listing scope derived from the caller's identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    /// No restriction (admin)
    All,
    /// Only records owned by this user id
    Owner(i64),
}

impl ScopeFilter {
    /// Whether a record with the given owner passes this filter
    pub fn matches(&self, owner_id: Option<i64>) -> bool {
        match self {
            Self::All => true,
            Self::Owner(id) => owner_id == Some(*id),
        }
    }
}

/// Stateless ownership policy
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// Scope filter for list queries
    ///
    /// Admins see everything, customers see their own records and
    /// anonymous callers are rejected before any query runs.
    pub fn scope_filter(ctx: &OwnershipContext) -> AppResult<ScopeFilter> {
        match ctx.user_id {
            Some(_) if ctx.is_admin() => Ok(ScopeFilter::All),
            Some(id) => Ok(ScopeFilter::Owner(id)),
            None => Err(AppError::not_authenticated()),
        }
    }

    /// Authorize access to a single loaded record
    ///
    /// The record must already be loaded so the decision can compare
    /// against its real owner. Denials are written to the security log.
    pub fn authorize_single(
        ctx: &OwnershipContext,
        resource: &str,
        resource_id: i64,
        owner_id: Option<i64>,
    ) -> AppResult<()> {
        let Some(caller_id) = ctx.user_id else {
            security_log!(
                WARN,
                "unauthenticated_access",
                resource = resource,
                resource_id = resource_id
            );
            return Err(AppError::not_authenticated());
        };

        if ctx.is_admin() {
            return Ok(());
        }

        if owner_id == Some(caller_id) {
            return Ok(());
        }

        security_log!(
            WARN,
            "ownership_violation",
            caller_id = caller_id,
            resource = resource,
            resource_id = resource_id,
            owner_id = owner_id
        );
        Err(AppError::ownership_violation(
            resource,
            resource_id,
            owner_id,
            Some(caller_id),
        ))
    }

    /// Require the admin role
    pub fn require_admin(ctx: &OwnershipContext) -> AppResult<()> {
        let Some(caller_id) = ctx.user_id else {
            return Err(AppError::not_authenticated());
        };
        if ctx.is_admin() {
            return Ok(());
        }
        security_log!(WARN, "admin_required", caller_id = caller_id);
        Err(AppError::admin_required())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn anonymous_gets_not_authenticated() {
        let ctx = OwnershipContext::anonymous();
        let err = OwnershipGuard::scope_filter(&ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);

        let err = OwnershipGuard::authorize_single(&ctx, "order", 1, Some(2)).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[test]
    fn customer_scope_is_owner() {
        let ctx = OwnershipContext::customer(5);
        assert_eq!(
            OwnershipGuard::scope_filter(&ctx).unwrap(),
            ScopeFilter::Owner(5)
        );
    }

    #[test]
    fn admin_scope_is_all() {
        let ctx = OwnershipContext::admin(1);
        assert_eq!(OwnershipGuard::scope_filter(&ctx).unwrap(), ScopeFilter::All);
    }

    #[test]
    fn owner_may_access_own_record() {
        let ctx = OwnershipContext::customer(5);
        assert!(OwnershipGuard::authorize_single(&ctx, "order", 10, Some(5)).is_ok());
    }

    #[test]
    fn non_owner_gets_ownership_violation() {
        let ctx = OwnershipContext::customer(5);
        let err = OwnershipGuard::authorize_single(&ctx, "order", 10, Some(6)).unwrap_err();
        assert_eq!(err.code, ErrorCode::OwnershipViolation);
        // Existence is not leaked: status maps to 403, not 404
        assert_eq!(err.code.http_status(), http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn admin_bypasses_ownership() {
        let ctx = OwnershipContext::admin(1);
        assert!(OwnershipGuard::authorize_single(&ctx, "order", 10, Some(6)).is_ok());
    }

    #[test]
    fn guest_owned_record_is_admin_only() {
        let ctx = OwnershipContext::customer(5);
        let err = OwnershipGuard::authorize_single(&ctx, "order", 10, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::OwnershipViolation);
        assert!(OwnershipGuard::authorize_single(&OwnershipContext::admin(1), "order", 10, None).is_ok());
    }

    #[test]
    fn require_admin_rejects_customers() {
        let err = OwnershipGuard::require_admin(&OwnershipContext::customer(5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert!(OwnershipGuard::require_admin(&OwnershipContext::admin(1)).is_ok());
    }

    #[test]
    fn scope_filter_matches() {
        assert!(ScopeFilter::All.matches(None));
        assert!(ScopeFilter::Owner(3).matches(Some(3)));
        assert!(!ScopeFilter::Owner(3).matches(Some(4)));
        assert!(!ScopeFilter::Owner(3).matches(None));
    }
}
