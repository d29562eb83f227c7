//! Order pipeline
//!
//! Turns a cart into an immutable order in one transaction and owns the
//! status state machines afterwards.

mod pipeline;

pub use pipeline::{
    CheckoutResponse, CreateOrderRequest, OrderDetail, OrderPipeline, UpdatePaymentStatusRequest,
    UpdateStatusRequest,
};
