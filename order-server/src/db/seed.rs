//! Demo seed data
//!
//! Loaded once at startup so the platform is usable out of the box:
//! categories, a small drink menu, the S/M/L size ladder, toppings and
//! two users (one admin, one customer).

use chrono::Utc;
use rust_decimal::Decimal;
use shared::models::{Category, Product, Role, Size, Topping, User};

use super::MemoryStore;

/// Load demo data into an empty store
///
/// Idempotence is not needed: this runs once against a fresh store.
pub async fn load_demo_data(store: &MemoryStore) {
    let result = store
        .transaction(|t| -> super::StoreResult<()> {
            let now = Utc::now();

            // Categories
            let categories = [
                ("Trà Sữa", "tra-sua", 1),
                ("Cà Phê", "ca-phe", 2),
                ("Nước Ép", "nuoc-ep", 3),
                ("Trà Trái Cây", "tra-trai-cay", 4),
            ];
            let mut category_ids = Vec::new();
            for (name, slug, display_order) in categories {
                let id = t.allocate_id();
                t.categories.insert(
                    id,
                    Category {
                        id,
                        name: name.to_string(),
                        slug: slug.to_string(),
                        display_order,
                        is_active: true,
                        created_at: now,
                    },
                );
                category_ids.push(id);
            }

            // Users: one admin (owns the seed menu), one customer
            let admin_id = t.allocate_id();
            t.users.insert(
                admin_id,
                User {
                    id: admin_id,
                    full_name: "Quản Trị Viên".to_string(),
                    email: "admin@example.com".to_string(),
                    phone: Some("0900000001".to_string()),
                    role: Role::Admin,
                    created_at: now,
                },
            );
            let customer_id = t.allocate_id();
            t.users.insert(
                customer_id,
                User {
                    id: customer_id,
                    full_name: "Nguyễn Văn A".to_string(),
                    email: "customer@example.com".to_string(),
                    phone: Some("0900000002".to_string()),
                    role: Role::Customer,
                    created_at: now,
                },
            );

            // Menu
            let products: [(&str, i64, usize); 8] = [
                ("Trà Sữa Truyền Thống", 35_000, 0),
                ("Trà Sữa Matcha", 40_000, 0),
                ("Trà Sữa Socola", 42_000, 0),
                ("Cà Phê Sữa Đá", 29_000, 1),
                ("Cà Phê Đen", 25_000, 1),
                ("Nước Ép Cam", 35_000, 2),
                ("Nước Ép Dưa Hấu", 32_000, 2),
                ("Trà Đào Cam Sả", 45_000, 3),
            ];
            for (name, price, category_idx) in products {
                let id = t.allocate_id();
                t.products.insert(
                    id,
                    Product {
                        id,
                        name: name.to_string(),
                        description: None,
                        base_price: Decimal::from(price),
                        category_id: category_ids[category_idx],
                        image_url: None,
                        is_available: true,
                        owner_id: admin_id,
                        created_at: now,
                    },
                );
            }

            // Size ladder
            let sizes = [("S", "Nhỏ", 0), ("M", "Vừa", 5_000), ("L", "Lớn", 10_000)];
            for (code, name, delta) in sizes {
                let id = t.allocate_id();
                t.sizes.insert(
                    id,
                    Size {
                        id,
                        code: code.to_string(),
                        name: name.to_string(),
                        additional_price: Decimal::from(delta),
                    },
                );
            }

            // Toppings
            let toppings = [
                ("Trân Châu Đen", 8_000),
                ("Trân Châu Trắng", 7_000),
                ("Thạch Dừa", 5_000),
                ("Kem Cheese", 10_000),
            ];
            for (name, price) in toppings {
                let id = t.allocate_id();
                t.toppings.insert(
                    id,
                    Topping {
                        id,
                        name: name.to_string(),
                        price: Decimal::from(price),
                        is_available: true,
                    },
                );
            }

            Ok(())
        })
        .await;

    match result {
        Ok(()) => tracing::info!("Demo data loaded"),
        Err(e) => tracing::error!(error = %e, "Failed to load demo data"),
    }
}
