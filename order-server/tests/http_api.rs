//! HTTP integration tests
//!
//! Drive the full router with `tower::ServiceExt::oneshot`, asserting
//! on the response envelope and status codes.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use order_server::{Config, ServerState};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app() -> Router {
    let config = Config::from_env();
    let state = ServerState::bare(&config);
    order_server::db::seed::load_demo_data(&state.store).await;
    order_server::api::build_app(state)
}

/// Extra headers as (name, value) pairs
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn first_product_id(app: &Router) -> i64 {
    let (status, body) = send(app, "GET", "/api/products", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    body["data"][0]["id"].as_i64().unwrap()
}

fn checkout_body(voucher: Option<&str>) -> Value {
    json!({
        "customer_name": "Nguyễn Văn A",
        "customer_phone": "0900000002",
        "shipping_address": "1 Lê Lợi, Quận 1",
        "payment_method": "COD",
        "voucher_code": voucher,
    })
}

#[tokio::test]
async fn health_uses_the_envelope() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("ok"));
}

#[tokio::test]
async fn storefront_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/products", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().len() >= 8);

    let (status, body) = send(&app, "GET", "/api/categories", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);

    let (status, body) = send(&app, "GET", "/api/products/by-category/ca-phe", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/api/products/by-category/nope", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_without_scope_is_refused() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/api/cart", &[], None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn session_cart_flow_through_checkout() {
    let app = test_app().await;
    let session = [("x-session-id", "sess-abc")];
    let product_id = first_product_id(&app).await;

    // Add two of the same product
    let (status, body) = send(
        &app,
        "POST",
        "/api/cart/items",
        &session,
        Some(json!({"product_id": product_id, "quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let line_id = body["data"]["id"].as_i64().unwrap();

    // Same selection merges
    let (_, body) = send(
        &app,
        "POST",
        "/api/cart/items",
        &session,
        Some(json!({"product_id": product_id, "quantity": 1})),
    )
    .await;
    assert_eq!(body["data"]["id"].as_i64().unwrap(), line_id);
    assert_eq!(body["data"]["quantity"], json!(3));

    // Checkout as guest
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        &session,
        Some(checkout_body(None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Order placed"));
    assert!(body["data"]["order"]["order_number"]
        .as_str()
        .unwrap()
        .starts_with("ORD"));
    assert_eq!(body["data"]["order"]["user_id"], Value::Null);

    // The cart is consumed
    let (_, body) = send(&app, "GET", "/api/cart", &session, None).await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 0);

    // A second checkout finds an empty cart
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        &session,
        Some(checkout_body(None)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn order_access_is_ownership_scoped() {
    let app = test_app().await;
    let owner = [("x-user-id", "42")];
    let product_id = first_product_id(&app).await;

    send(
        &app,
        "POST",
        "/api/cart/items",
        &owner,
        Some(json!({"product_id": product_id, "quantity": 1})),
    )
    .await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        &owner,
        Some(checkout_body(None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let order_id = body["data"]["order"]["id"].as_i64().unwrap();
    let uri = format!("/api/orders/{order_id}");

    // Owner reads fine
    let (status, _) = send(&app, "GET", &uri, &owner, None).await;
    assert_eq!(status, StatusCode::OK);

    // Anonymous is unauthenticated
    let (status, body) = send(&app, "GET", &uri, &[], None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    // Another customer gets a denial, not a 404
    let (status, body) = send(&app, "GET", &uri, &[("x-user-id", "7")], None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));

    // Admin bypasses ownership
    let admin = [("x-user-id", "1"), ("x-user-role", "Admin")];
    let (status, _) = send(&app, "GET", &uri, &admin, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn voucher_applies_in_cart_summary() {
    let app = test_app().await;
    let user = [("x-user-id", "42")];
    let product_id = first_product_id(&app).await;

    send(
        &app,
        "POST",
        "/api/cart/items",
        &user,
        Some(json!({"product_id": product_id, "quantity": 1})),
    )
    .await;

    // Unknown code degrades gracefully
    let (status, body) = send(&app, "GET", "/api/cart?voucher=FOOBAR", &user, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["discount"].as_f64().unwrap(), 0.0);
    assert!(body["data"]["voucher_message"].is_string());

    // Known code discounts
    let (_, body) = send(&app, "GET", "/api/cart?voucher=giam10", &user, None).await;
    assert!(body["data"]["discount"].as_f64().unwrap() > 0.0);
    assert!(body["data"]["voucher_message"].is_null());
}

#[tokio::test]
async fn admin_surface_requires_the_role() {
    let app = test_app().await;
    let customer = [("x-user-id", "42")];
    let admin = [("x-user-id", "1"), ("x-user-role", "Admin")];

    let (status, _) = send(&app, "GET", "/api/admin/dashboard", &customer, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "GET", "/api/admin/dashboard", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_orders"], json!(0));
    assert_eq!(body["data"]["period"], json!("today"));

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/dashboard?period=week",
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["period"], json!("week"));

    let (status, body) = send(
        &app,
        "GET",
        "/api/admin/dashboard/top-products?limit=3",
        &admin,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, "GET", "/api/admin/orders?page_size=5", &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(0));
    assert_eq!(body["data"]["page_size"], json!(5));

    let (status, _) = send(&app, "GET", "/api/admin/customers", &customer, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_drives_the_order_lifecycle() {
    let app = test_app().await;
    let user = [("x-user-id", "42")];
    let admin = [("x-user-id", "1"), ("x-user-role", "Admin")];
    let product_id = first_product_id(&app).await;

    send(
        &app,
        "POST",
        "/api/cart/items",
        &user,
        Some(json!({"product_id": product_id, "quantity": 1})),
    )
    .await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/orders",
        &user,
        Some(checkout_body(None)),
    )
    .await;
    let order_id = body["data"]["order"]["id"].as_i64().unwrap();
    let status_uri = format!("/api/admin/orders/{order_id}/status");

    // Skipping Confirmed is refused
    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        &admin,
        Some(json!({"status": "Preparing"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    // The adjacent step works
    let (status, body) = send(
        &app,
        "PUT",
        &status_uri,
        &admin,
        Some(json!({"status": "Confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("Confirmed"));

    // Customers cannot drive the lifecycle
    let (status, _) = send(
        &app,
        "PUT",
        &status_uri,
        &user,
        Some(json!({"status": "Preparing"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn product_creation_stamps_the_owner() {
    let app = test_app().await;
    let creator = [("x-user-id", "42")];
    let stranger = [("x-user-id", "7")];

    let (_, categories) = send(&app, "GET", "/api/categories", &[], None).await;
    let category_id = categories["data"][0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/admin/products",
        &creator,
        Some(json!({
            "name": "Trà Sữa Khoai Môn",
            "base_price": 38000,
            "category_id": category_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["owner_id"], json!(42));
    let product_id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/admin/products/{product_id}");

    // The stranger cannot touch it
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        &stranger,
        Some(json!({"base_price": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Listing only shows own products to non-admins
    let (_, body) = send(&app, "GET", "/api/admin/products", &stranger, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}
