//! Debounced snapshot persistence
//!
//! Mutations mark a collection dirty instead of writing immediately. A
//! background task waits for a quiescence window (default 500ms) after the
//! most recent mark, then commits one full snapshot per dirty collection.
//! A burst of edits therefore costs one write per collection, and a newer
//! snapshot always supersedes an older unwritten one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};

use shared::{Customer, Ingredient, Order, Product};

use crate::error::AppResult;
use crate::store::{Collection, SnapshotStore};

/// Snapshot payload for one collection
#[derive(Debug, Clone)]
pub enum SavePayload {
    Ingredients(Vec<Ingredient>),
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Customers(Vec<Customer>),
}

impl SavePayload {
    fn collection(&self) -> Collection {
        match self {
            SavePayload::Ingredients(_) => Collection::Ingredients,
            SavePayload::Products(_) => Collection::Products,
            SavePayload::Orders(_) => Collection::Orders,
            SavePayload::Customers(_) => Collection::Customers,
        }
    }
}

#[derive(Debug)]
struct SaveIntent {
    seq: u64,
    payload: SavePayload,
}

enum Command {
    Save(SaveIntent),
    Flush(oneshot::Sender<()>),
}

/// Handle for scheduling debounced snapshot saves
///
/// Cloneable; all clones feed the same background task. Dropping every
/// clone closes the channel, and the task flushes whatever is still
/// pending before exiting.
#[derive(Clone)]
pub struct DebouncedWriter {
    tx: mpsc::UnboundedSender<Command>,
    clock: Arc<AtomicU64>,
}

impl DebouncedWriter {
    /// Spawn the background flush task and return a writer handle
    pub fn spawn(
        store: Arc<dyn SnapshotStore>,
        debounce: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_flush_task(store, rx, debounce));
        (
            Self {
                tx,
                clock: Arc::new(AtomicU64::new(0)),
            },
            handle,
        )
    }

    /// Queue a snapshot save, superseding any unwritten snapshot of the
    /// same collection
    pub fn schedule(&self, payload: SavePayload) {
        let seq = self.clock.fetch_add(1, Ordering::SeqCst);
        // A send can only fail after the flush task has exited
        if self
            .tx
            .send(Command::Save(SaveIntent { seq, payload }))
            .is_err()
        {
            error!("debounced writer task is gone, snapshot save dropped");
        }
    }

    /// Force all pending snapshots to disk immediately and wait for the
    /// writes to finish
    pub async fn flush(&self) -> AppResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_ok() {
            // Ignore a dropped ack; it means the task already exited after
            // its final flush
            let _ = ack_rx.await;
        }
        Ok(())
    }
}

async fn run_flush_task(
    store: Arc<dyn SnapshotStore>,
    mut rx: mpsc::UnboundedReceiver<Command>,
    debounce: Duration,
) {
    info!(debounce_ms = debounce.as_millis() as u64, "debounced writer started");

    let mut pending: HashMap<Collection, SaveIntent> = HashMap::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let command = match deadline {
            Some(at) => {
                tokio::select! {
                    cmd = rx.recv() => cmd,
                    _ = tokio::time::sleep_until(at) => {
                        deadline = flush_pending(store.as_ref(), &mut pending, debounce).await;
                        continue;
                    }
                }
            }
            None => rx.recv().await,
        };

        match command {
            Some(Command::Save(intent)) => {
                let collection = intent.payload.collection();
                match pending.get(&collection) {
                    // Out-of-order delivery cannot happen on a single
                    // channel, but the sequence check keeps the supersede
                    // rule explicit
                    Some(existing) if existing.seq > intent.seq => {}
                    _ => {
                        pending.insert(collection, intent);
                    }
                }
                deadline = Some(Instant::now() + debounce);
            }
            Some(Command::Flush(ack)) => {
                deadline = flush_pending(store.as_ref(), &mut pending, debounce).await;
                let _ = ack.send(());
            }
            None => {
                // All writer handles dropped; final flush then exit
                flush_pending(store.as_ref(), &mut pending, debounce).await;
                info!("debounced writer stopped");
                return;
            }
        }
    }
}

/// Write every pending snapshot; failed writes stay pending and a new
/// deadline is returned so they get retried
async fn flush_pending(
    store: &dyn SnapshotStore,
    pending: &mut HashMap<Collection, SaveIntent>,
    debounce: Duration,
) -> Option<Instant> {
    let collections: Vec<Collection> = pending.keys().copied().collect();

    for collection in collections {
        let Some(intent) = pending.remove(&collection) else {
            continue;
        };

        let result = match &intent.payload {
            SavePayload::Ingredients(items) => store.save_ingredients(items).await,
            SavePayload::Products(items) => store.save_products(items).await,
            SavePayload::Orders(items) => store.save_orders(items).await,
            SavePayload::Customers(items) => store.save_customers(items).await,
        };

        match result {
            Ok(()) => {
                debug!(collection = collection.name(), seq = intent.seq, "snapshot saved");
            }
            Err(e) => {
                error!(
                    collection = collection.name(),
                    error = %e,
                    "snapshot save failed, will retry"
                );
                // A newer intent may have arrived concurrently; keep the
                // newest one
                match pending.get(&collection) {
                    Some(existing) if existing.seq > intent.seq => {}
                    _ => {
                        pending.insert(collection, intent);
                    }
                }
            }
        }
    }

    if pending.is_empty() {
        None
    } else {
        Some(Instant::now() + debounce)
    }
}
