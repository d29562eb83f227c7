//! Identity extraction from trusted gateway headers
//!
//! The upstream gateway authenticates the caller and forwards identity
//! as `x-user-id` and `x-user-role`. Extraction is infallible: missing
//! or malformed headers yield an anonymous context, and the guard layer
//! decides what an anonymous caller may do.

use std::convert::Infallible;
use std::str::FromStr;

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::models::Role;

use super::OwnershipContext;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

impl<S> FromRequestParts<S> for OwnershipContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|id| *id > 0);

        // Role header is only honored for authenticated callers.
        // Unknown role values fall back to Customer.
        let role = match user_id {
            Some(_) => parts
                .headers
                .get(USER_ROLE_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| Role::from_str(v).ok())
                .unwrap_or(Role::Customer),
            None => Role::Customer,
        };

        Ok(OwnershipContext { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use http::Request;

    async fn extract(headers: &[(&str, &str)]) -> OwnershipContext {
        let mut builder = Request::builder().uri("/");
        for (k, v) in headers {
            builder = builder.header(*k, *v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        OwnershipContext::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn missing_headers_yield_anonymous() {
        let ctx = extract(&[]).await;
        assert_eq!(ctx, OwnershipContext::anonymous());
    }

    #[tokio::test]
    async fn valid_headers_yield_identity() {
        let ctx = extract(&[("x-user-id", "42"), ("x-user-role", "Admin")]).await;
        assert_eq!(ctx, OwnershipContext::admin(42));
    }

    #[tokio::test]
    async fn malformed_id_yields_anonymous() {
        let ctx = extract(&[("x-user-id", "not-a-number"), ("x-user-role", "Admin")]).await;
        assert_eq!(ctx, OwnershipContext::anonymous());
    }

    #[tokio::test]
    async fn unknown_role_falls_back_to_customer() {
        let ctx = extract(&[("x-user-id", "7"), ("x-user-role", "superuser")]).await;
        assert_eq!(ctx, OwnershipContext::customer(7));
    }

    #[tokio::test]
    async fn role_without_id_is_ignored() {
        let ctx = extract(&[("x-user-role", "Admin")]).await;
        assert_eq!(ctx, OwnershipContext::anonymous());
    }
}
