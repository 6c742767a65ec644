use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    core::service::{OrderService, OrderStats, ServiceError},
    order::{OrderDraft, OrderRecord},
    types::OrderId,
};

use super::events::OrderEvent;

/// Failures surfaced by the async handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The underlying service rejected the operation.
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// The runtime loop is no longer running.
    #[error("service loop closed")]
    ChannelClosed,
}

/// Channel sizing for the runtime loop.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the command channel feeding the loop.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event stream.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

/// Cloneable async handle to a spawned [`OrderService`] loop.
///
/// All operations, reads included, execute serially inside the loop, so
/// callers never observe the store and the queue mid-mutation and the id
/// counter never issues duplicates.
#[derive(Clone)]
pub struct OrderServiceHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<OrderEvent>,
}

enum Command {
    Create {
        draft: OrderDraft,
        resp: oneshot::Sender<Result<OrderRecord, RuntimeError>>,
    },
    List {
        resp: oneshot::Sender<Vec<OrderRecord>>,
    },
    Get {
        id: OrderId,
        resp: oneshot::Sender<Result<OrderRecord, RuntimeError>>,
    },
    Cancel {
        id: OrderId,
        resp: oneshot::Sender<Result<OrderRecord, RuntimeError>>,
    },
    DispatchNext {
        resp: oneshot::Sender<Result<OrderRecord, RuntimeError>>,
    },
    RollbackLast {
        resp: oneshot::Sender<Result<OrderRecord, RuntimeError>>,
    },
    Stats {
        resp: oneshot::Sender<OrderStats>,
    },
    TotalAmountRecursive {
        resp: oneshot::Sender<f64>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer loop that owns `service` and returns its handle.
pub fn spawn_order_service(service: OrderService, config: RuntimeConfig) -> OrderServiceHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<OrderEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut service = service;
        tracing::info!("order service runtime started");

        while let Some(cmd) = cmd_rx.recv().await {
            if handle_command(cmd, &mut service, &events_tx_loop) {
                break;
            }
        }

        tracing::info!("order service runtime stopped");
    });

    OrderServiceHandle { cmd_tx, events_tx }
}

impl OrderServiceHandle {
    /// Subscribes to the event stream. Events arrive in operation order.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.events_tx.subscribe()
    }

    pub async fn create(&self, draft: OrderDraft) -> Result<OrderRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Create { draft, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn list(&self) -> Result<Vec<OrderRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::List { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn get(&self, id: OrderId) -> Result<OrderRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Get { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn cancel(&self, id: OrderId) -> Result<OrderRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Cancel { id, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn dispatch_next(&self) -> Result<OrderRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::DispatchNext { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn rollback_last(&self) -> Result<OrderRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RollbackLast { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn stats(&self) -> Result<OrderStats, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Stats { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn total_amount_recursive(&self) -> Result<f64, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::TotalAmountRecursive { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Stops the loop after all previously queued commands have been served.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command(
    cmd: Command,
    service: &mut OrderService,
    events_tx: &broadcast::Sender<OrderEvent>,
) -> bool {
    match cmd {
        Command::Create { draft, resp } => {
            let res = service.create(draft).map_err(RuntimeError::from);
            if let Ok(rec) = &res {
                let _ = events_tx.send(OrderEvent::Created { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::List { resp } => {
            let _ = resp.send(service.list_cloned());
        }
        Command::Get { id, resp } => {
            let _ = resp.send(service.get_cloned(id).map_err(RuntimeError::from));
        }
        Command::Cancel { id, resp } => {
            let res = service.cancel(id).map_err(RuntimeError::from);
            if let Ok(rec) = &res {
                let _ = events_tx.send(OrderEvent::Cancelled { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::DispatchNext { resp } => {
            let res = service.dispatch_next().map_err(RuntimeError::from);
            if let Ok(rec) = &res {
                let _ = events_tx.send(OrderEvent::Dispatched { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::RollbackLast { resp } => {
            let res = service.rollback_last().map_err(RuntimeError::from);
            if let Ok(rec) = &res {
                let _ = events_tx.send(OrderEvent::RolledBack { id: rec.id });
            }
            let _ = resp.send(res);
        }
        Command::Stats { resp } => {
            let _ = resp.send(service.stats());
        }
        Command::TotalAmountRecursive { resp } => {
            let _ = resp.send(service.total_amount_recursive());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}
