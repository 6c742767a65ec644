//! In-memory food-order ledger with FIFO dispatch and single-step undo.
//!
//! # Examples
//!
//! Synchronous usage with [`core::service::OrderService`]:
//! ```
//! use ordertrack::{core::service::OrderService, order::OrderDraft, types::OrderStatus};
//!
//! let mut service = OrderService::new();
//! let order = service.create(OrderDraft {
//!     customer_name: "Ada".to_string(),
//!     description: "double burger".to_string(),
//!     amount: 10.5,
//! }).expect("create");
//! assert_eq!(order.id, 1);
//! assert_eq!(order.status, OrderStatus::Registered);
//!
//! let dispatched = service.dispatch_next().expect("dispatch");
//! assert_eq!(dispatched.id, 1);
//!
//! let undone = service.rollback_last().expect("rollback");
//! assert_eq!(undone.status, OrderStatus::Registered);
//! ```
//!
//! Async usage through the single-writer runtime:
//! ```
//! use ordertrack::{
//!     core::service::OrderService,
//!     order::OrderDraft,
//!     runtime::handle::{spawn_order_service, RuntimeConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let handle = spawn_order_service(OrderService::new(), RuntimeConfig::default());
//! let order = handle.create(OrderDraft {
//!     customer_name: "Grace".to_string(),
//!     description: "fries".to_string(),
//!     amount: 5.0,
//! }).await.expect("create");
//! assert_eq!(order.id, 1);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Order ledger containers and the orchestrating service.
pub mod core;
/// Operation records kept by the undo history.
pub mod op;
/// Order domain records and create payloads.
pub mod order;
/// Single-writer async runtime over the service.
pub mod runtime;
/// Shared id and status primitives.
pub mod types;
