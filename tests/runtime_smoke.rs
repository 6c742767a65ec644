use std::time::Duration;

use ordertrack::{
    core::service::{OrderService, ServiceError},
    order::OrderDraft,
    runtime::{
        events::OrderEvent,
        handle::{RuntimeError, RuntimeConfig, spawn_order_service},
    },
    types::OrderStatus,
};

fn draft(customer: &str, amount: f64) -> OrderDraft {
    OrderDraft {
        customer_name: customer.to_string(),
        description: "meal".to_string(),
        amount,
    }
}

async fn next_event(sub: &mut tokio::sync::broadcast::Receiver<OrderEvent>) -> OrderEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("event timeout")
        .expect("recv")
}

#[tokio::test]
async fn runtime_create_cancel_query_and_events_ordered() {
    let handle = spawn_order_service(OrderService::new(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let created = handle.create(draft("Ada", 10.0)).await.expect("create");
    assert_eq!(created.id, 1);

    let cancelled = handle.cancel(created.id).await.expect("cancel");
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let fetched = handle.get(created.id).await.expect("get");
    assert_eq!(fetched.status, OrderStatus::Cancelled);

    assert_eq!(next_event(&mut sub).await, OrderEvent::Created { id: 1 });
    assert_eq!(next_event(&mut sub).await, OrderEvent::Cancelled { id: 1 });

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_surfaces_service_errors_unchanged() {
    let handle = spawn_order_service(OrderService::new(), RuntimeConfig::default());

    let err = handle.dispatch_next().await.expect_err("empty queue");
    assert_eq!(
        err,
        RuntimeError::Service(ServiceError::Conflict("queue empty"))
    );

    let err = handle.rollback_last().await.expect_err("empty history");
    assert_eq!(
        err,
        RuntimeError::Service(ServiceError::Conflict("nothing to rollback"))
    );

    let err = handle.get(9).await.expect_err("unknown id");
    assert_eq!(err, RuntimeError::Service(ServiceError::NotFound(9)));

    let err = handle.create(draft("Ada", 0.0)).await.expect_err("bad amount");
    assert_eq!(
        err,
        RuntimeError::Service(ServiceError::Validation {
            field: "amount",
            problem: "must be greater than zero",
        })
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_dispatch_rollback_and_stats_round_trip() {
    let handle = spawn_order_service(OrderService::new(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    handle.create(draft("Ada", 10.0)).await.expect("create");
    handle.create(draft("Grace", 5.0)).await.expect("create");

    let dispatched = handle.dispatch_next().await.expect("dispatch");
    assert_eq!(dispatched.id, 1);

    let undone = handle.rollback_last().await.expect("rollback");
    assert_eq!((undone.id, undone.status), (1, OrderStatus::Registered));

    let orders = handle.list().await.expect("list");
    assert_eq!(orders.len(), 2);
    assert!(
        orders
            .iter()
            .all(|rec| rec.status == OrderStatus::Registered)
    );

    let stats = handle.stats().await.expect("stats");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.total_amount, 15.0);
    assert_eq!(stats.registered, 2);

    let total = handle.total_amount_recursive().await.expect("total");
    assert_eq!(total, 15.0);

    let expected = [
        OrderEvent::Created { id: 1 },
        OrderEvent::Created { id: 2 },
        OrderEvent::Dispatched { id: 1 },
        OrderEvent::RolledBack { id: 1 },
    ];
    for want in expected {
        assert_eq!(next_event(&mut sub).await, want);
    }

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn runtime_handle_is_cloneable_and_shares_the_loop() {
    let handle = spawn_order_service(OrderService::new(), RuntimeConfig::default());
    let other = handle.clone();

    handle.create(draft("Ada", 10.0)).await.expect("create");
    let seen = other.get(1).await.expect("get via clone");
    assert_eq!(seen.customer_name, "Ada");

    handle.shutdown().await.expect("shutdown");
}
