//! Domain models
//!
//! Entities and their create/update payloads. Monetary values are
//! `rust_decimal::Decimal` throughout; ids are `i64`.

pub mod cart;
pub mod category;
pub mod order;
pub mod product;
pub mod size;
pub mod topping;
pub mod user;

pub use cart::{CartLine, CartScope};
pub use category::{Category, CategoryCreate};
pub use order::{Order, OrderLine, OrderStatus, PaymentMethod, PaymentStatus};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use size::Size;
pub use topping::Topping;
pub use user::{Role, User};
