use chrono::Utc;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    auth::{AccessGate, Principal},
    config::RuntimeConfig,
    engine::{
        import::{ImportSummary, import_rows},
        mutation::{UpdateOutcome, create_product, delete_product, update_product},
    },
    error::{InventoryError, InventoryResult},
    history::HistoryEntry,
    persist::InventoryStore,
    product::{ImportRow, Product, ProductInput},
    types::ProductId,
};

use super::events::InventoryEvent;

type Reply<T> = oneshot::Sender<InventoryResult<T>>;

/// Cloneable front end to the inventory worker.
#[derive(Clone)]
pub struct InventoryHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<InventoryEvent>,
    gate: AccessGate,
}

enum Command {
    List {
        resp: Reply<Vec<Product>>,
    },
    Search {
        query: String,
        category: Option<String>,
        resp: Reply<Vec<Product>>,
    },
    Categories {
        resp: Reply<Vec<String>>,
    },
    History {
        id: ProductId,
        resp: Reply<Vec<HistoryEntry>>,
    },
    Create {
        principal: Principal,
        input: ProductInput,
        resp: Reply<ProductId>,
    },
    Update {
        principal: Principal,
        id: ProductId,
        input: ProductInput,
        resp: Reply<UpdateOutcome>,
    },
    Delete {
        principal: Principal,
        id: ProductId,
        resp: Reply<()>,
    },
    Import {
        principal: Principal,
        rows: Vec<ImportRow>,
        resp: Reply<ImportSummary>,
    },
    Shutdown {
        resp: Reply<()>,
    },
}

/// Moves `store` onto a dedicated blocking worker and returns a handle to it.
///
/// Every command, read or write, runs on that one worker in arrival order,
/// so an update's read, history append and write never interleave with
/// another mutation. Must be called from within a tokio runtime.
pub fn spawn_inventory<S>(store: S, gate: AccessGate, config: RuntimeConfig) -> InventoryHandle
where
    S: InventoryStore + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<InventoryEvent>(config.event_capacity);

    let events_tx_loop = events_tx.clone();
    tokio::task::spawn_blocking(move || {
        let mut store = store;
        log::info!("inventory writer started");
        while let Some(cmd) = cmd_rx.blocking_recv() {
            if handle_command(cmd, &mut store, &events_tx_loop) {
                break;
            }
        }
        log::info!("inventory writer stopped");
    });

    InventoryHandle {
        cmd_tx,
        events_tx,
        gate,
    }
}

impl InventoryHandle {
    /// New receiver for change events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<InventoryEvent> {
        self.events_tx.subscribe()
    }

    /// All products, ascending id.
    pub async fn list_products(&self) -> InventoryResult<Vec<Product>> {
        self.request(|resp| Command::List { resp }).await
    }

    /// Products whose name contains `query` (ASCII case-insensitive),
    /// narrowed to an exact `category` when one is given.
    pub async fn search_products(
        &self,
        query: impl Into<String>,
        category: Option<String>,
    ) -> InventoryResult<Vec<Product>> {
        let query = query.into();
        self.request(|resp| Command::Search {
            query,
            category,
            resp,
        })
        .await
    }

    /// Distinct non-empty categories, sorted.
    pub async fn list_categories(&self) -> InventoryResult<Vec<String>> {
        self.request(|resp| Command::Categories { resp }).await
    }

    /// History of `id`, newest first. Works for deleted products too.
    pub async fn get_history(&self, id: ProductId) -> InventoryResult<Vec<HistoryEntry>> {
        self.request(|resp| Command::History { id, resp }).await
    }

    /// Full product listing for export; formatting is up to the caller.
    pub async fn export_products(&self) -> InventoryResult<Vec<Product>> {
        self.list_products().await
    }

    /// Creates a product and returns its id. Protected.
    pub async fn create_product(
        &self,
        credential: Option<&str>,
        input: ProductInput,
    ) -> InventoryResult<ProductId> {
        self.protected(credential, |principal, resp| Command::Create {
            principal,
            input,
            resp,
        })
        .await
    }

    /// Replaces every attribute of `id`, recording history when stock moves.
    /// Protected.
    pub async fn update_product(
        &self,
        credential: Option<&str>,
        id: ProductId,
        input: ProductInput,
    ) -> InventoryResult<UpdateOutcome> {
        self.protected(credential, |principal, resp| Command::Update {
            principal,
            id,
            input,
            resp,
        })
        .await
    }

    /// Removes `id`; its history stays. Protected.
    pub async fn delete_product(&self, credential: Option<&str>, id: ProductId) -> InventoryResult<()> {
        self.protected(credential, |principal, resp| Command::Delete {
            principal,
            id,
            resp,
        })
        .await
    }

    /// Inserts rows one by one and reports the counts. Protected.
    pub async fn import_rows(
        &self,
        credential: Option<&str>,
        rows: Vec<ImportRow>,
    ) -> InventoryResult<ImportSummary> {
        self.protected(credential, |principal, resp| Command::Import {
            principal,
            rows,
            resp,
        })
        .await
    }

    /// Stops the worker once queued commands ahead of this one are done.
    pub async fn shutdown(&self) -> InventoryResult<()> {
        self.request(|resp| Command::Shutdown { resp }).await
    }

    /// Runs the access gate, then dispatches. A rejected credential never
    /// reaches the command queue.
    async fn protected<T, F>(&self, credential: Option<&str>, make: F) -> InventoryResult<T>
    where
        F: FnOnce(Principal, Reply<T>) -> Command,
    {
        let principal = self.gate.authorize(credential)?;
        self.request(|resp| make(principal, resp)).await
    }

    async fn request<T, F>(&self, make: F) -> InventoryResult<T>
    where
        F: FnOnce(Reply<T>) -> Command,
    {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(make(tx)).await.map_err(|_| closed())?;
        rx.await.map_err(|_| closed())?
    }
}

fn closed() -> InventoryError {
    InventoryError::StorageUnavailable("inventory runtime is not running".to_string())
}

fn handle_command<S>(
    cmd: Command,
    store: &mut S,
    events_tx: &broadcast::Sender<InventoryEvent>,
) -> bool
where
    S: InventoryStore,
{
    match cmd {
        Command::List { resp } => {
            let _ = resp.send(store.list_products().map_err(InventoryError::from));
        }
        Command::Search {
            query,
            category,
            resp,
        } => {
            let res = store.search_products(&query, category.as_deref());
            let _ = resp.send(res.map_err(InventoryError::from));
        }
        Command::Categories { resp } => {
            let _ = resp.send(store.list_categories().map_err(InventoryError::from));
        }
        Command::History { id, resp } => {
            let _ = resp.send(store.history_for(id).map_err(InventoryError::from));
        }
        Command::Create {
            principal,
            input,
            resp,
        } => {
            let res = create_product(store, input).inspect(|id| {
                log::info!("principal {} created product {id}", principal.id);
                let _ = events_tx.send(InventoryEvent::Created { id: *id });
            });
            let _ = resp.send(res);
        }
        Command::Update {
            principal,
            id,
            input,
            resp,
        } => {
            let res = update_product(store, id, input, Utc::now()).inspect(|outcome| {
                log::info!("principal {} updated product {id}", principal.id);
                let _ = events_tx.send(InventoryEvent::Updated { id });
                if let Some(entry) = &outcome.history {
                    let _ = events_tx.send(InventoryEvent::StockChanged {
                        id,
                        old_quantity: entry.old_quantity,
                        new_quantity: entry.new_quantity,
                    });
                }
            });
            let _ = resp.send(res);
        }
        Command::Delete {
            principal,
            id,
            resp,
        } => {
            let res = delete_product(store, id).inspect(|_| {
                log::info!("principal {} deleted product {id}", principal.id);
                let _ = events_tx.send(InventoryEvent::Deleted { id });
            });
            let _ = resp.send(res);
        }
        Command::Import {
            principal,
            rows,
            resp,
        } => {
            log::info!("principal {} importing {} rows", principal.id, rows.len());
            let summary = import_rows(store, rows);
            let _ = events_tx.send(InventoryEvent::Imported { summary });
            let _ = resp.send(Ok(summary));
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(Ok(()));
            return true;
        }
    }

    false
}
