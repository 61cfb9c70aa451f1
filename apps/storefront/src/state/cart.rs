//! # Cart Store
//!
//! The single owner of the shopping cart for a session.
//!
//! ## Thread Safety
//! The cart lives inside a `tokio::sync::watch` channel. Every mutation is
//! a `send_if_modified` call, so the read-modify-write, the notification
//! and the persistence enqueue all happen under the channel's lock:
//! 1. Independent callers (product cards, the detail panel, the cart view)
//!    may hold clones of the store and mutate concurrently
//! 2. Two rapid adds of the same line item are never lost
//! 3. Persisted snapshots are queued in mutation order
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Caller                  CartStore                  Side effects        │
//! │  ──────                  ─────────                  ────────────        │
//! │                                                                         │
//! │  Add to Cart ──────────► add_to_cart() ─────┐                           │
//! │  Change Quantity ──────► update_quantity() ─┤                           │
//! │  Click Remove ─────────► remove_from_cart() ├─► changed? ──► notify     │
//! │  Empty Cart ───────────► clear_cart() ──────┘       │        watchers   │
//! │                                                     │                   │
//! │                                                     └──────► enqueue    │
//! │                                                              snapshot   │
//! │                                                                 │       │
//! │  Cart badge / view ────► total_items()                          ▼       │
//! │                          total_price()            persistence writer    │
//! │                          subscribe()              (background task)     │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                                   CartStorage::save     │
//! │                                                   (failures logged)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store operations never fail. Persistence is best-effort: the in-memory
//! cart stays authoritative for the session even when writes are rejected.

use std::sync::{Arc, Mutex};

use storefront_core::{codec, Cart, CartTotals, LineItem, LineItemKey, Money, ProductId, Size};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use super::storage::CartStorage;

// =============================================================================
// Persistence Writer
// =============================================================================

/// Messages for the background persistence writer.
#[derive(Debug)]
enum PersistCommand {
    /// Write this encoded snapshot.
    Save(String),
    /// Acknowledge once every earlier command has been handled.
    Flush(oneshot::Sender<()>),
    /// Stop after every earlier command has been handled.
    Shutdown,
}

/// Drains the persistence queue into `storage`.
///
/// Consecutive queued snapshots are coalesced: only the newest one is
/// written, since each snapshot fully replaces the previous record.
async fn run_writer<S: CartStorage>(
    storage: S,
    key: String,
    mut commands: mpsc::UnboundedReceiver<PersistCommand>,
) {
    let mut deferred: Option<PersistCommand> = None;

    loop {
        let command = match deferred.take() {
            Some(command) => command,
            None => match commands.recv().await {
                Some(command) => command,
                None => break,
            },
        };

        match command {
            PersistCommand::Save(mut payload) => {
                let mut skipped = 0usize;
                while let Ok(next) = commands.try_recv() {
                    match next {
                        PersistCommand::Save(newer) => {
                            payload = newer;
                            skipped += 1;
                        }
                        other => {
                            deferred = Some(other);
                            break;
                        }
                    }
                }

                match storage.save(&key, &payload).await {
                    Ok(()) => debug!(key = %key, skipped, "Cart persisted"),
                    Err(e) => warn!(key = %key, error = %e, "Failed to persist cart; keeping in-memory state"),
                }
            }
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
            PersistCommand::Shutdown => break,
        }
    }

    debug!(key = %key, "Cart persistence writer stopped");
}

/// Reads the persisted cart once. Anything unusable yields an empty cart.
async fn rehydrate<S: CartStorage>(storage: &S, key: &str) -> Cart {
    match storage.load(key).await {
        Ok(None) => {
            debug!(key = %key, "No persisted cart; starting empty");
            Cart::new()
        }
        Ok(Some(raw)) => match codec::decode(&raw) {
            Ok(cart) => {
                info!(key = %key, line_count = cart.len(), total_items = cart.total_items(), "Cart rehydrated");
                cart
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unreadable persisted cart");
                Cart::new()
            }
        },
        Err(e) => {
            warn!(key = %key, error = %e, "Could not read persisted cart; starting empty");
            Cart::new()
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

struct StoreInner {
    state: watch::Sender<Cart>,
    persist: mpsc::UnboundedSender<PersistCommand>,
    writer: Mutex<Option<JoinHandle<()>>>,
    storage_key: String,
}

/// Shared handle to the session's cart.
///
/// Cloning is cheap; every clone operates on the same cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.inner.storage_key)
            .field("cart", &*self.inner.state.borrow())
            .finish()
    }
}

impl CartStore {
    /// Opens the store over `storage`, rehydrating from `storage_key`.
    ///
    /// Must be called from within a Tokio runtime: the persistence writer
    /// is spawned here.
    pub async fn open<S: CartStorage>(storage: S, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        let cart = rehydrate(&storage, &storage_key).await;

        let (state, _) = watch::channel(cart);
        let (persist, commands) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(storage, storage_key.clone(), commands));

        CartStore {
            inner: Arc::new(StoreInner {
                state,
                persist,
                writer: Mutex::new(Some(writer)),
                storage_key,
            }),
        }
    }

    /// The key the cart record is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Applies `f` atomically. On change, watchers are notified and the new
    /// snapshot is queued for persistence.
    fn mutate<F>(&self, op: &'static str, f: F) -> bool
    where
        F: FnOnce(&mut Cart) -> bool,
    {
        let persist = &self.inner.persist;

        let changed = self.inner.state.send_if_modified(|cart| {
            if !f(cart) {
                return false;
            }

            match codec::encode(cart) {
                Ok(payload) => {
                    if persist.send(PersistCommand::Save(payload)).is_err() {
                        debug!(op, "Persistence writer stopped; change kept in memory only");
                    }
                }
                Err(e) => warn!(op, error = %e, "Failed to encode cart for persistence"),
            }
            true
        });

        debug!(op, changed, "Cart operation");
        changed
    }

    /// Adds a line item, merging with an existing line of the same
    /// product, size and color.
    ///
    /// ## Behavior
    /// - Existing line: quantities add (capped at `MAX_QUANTITY`); name,
    ///   price and image are refreshed
    /// - New line: appended after existing lines
    /// - Item that would not survive a reload (quantity ≤ 0 or above the
    ///   cap, blank name or variant, negative price): ignored
    ///
    /// No stock check happens here; callers clamp with `QuantitySelector`.
    pub fn add_to_cart(&self, item: LineItem) -> bool {
        self.mutate("add_to_cart", |cart| cart.add_item(item))
    }

    /// Removes the line with this identity. No-op when absent.
    pub fn remove_from_cart(
        &self,
        product_id: impl Into<ProductId>,
        selected_size: impl Into<Size>,
        selected_color: impl Into<String>,
    ) -> bool {
        let key = LineItemKey::new(product_id, selected_size, selected_color);
        self.remove_line(&key)
    }

    /// Removes the line with this identity key. No-op when absent.
    pub fn remove_line(&self, key: &LineItemKey) -> bool {
        self.mutate("remove_from_cart", |cart| cart.remove_item(key))
    }

    /// Sets a line's quantity. `quantity <= 0` removes the line; an absent
    /// line is a no-op.
    pub fn update_quantity(
        &self,
        product_id: impl Into<ProductId>,
        selected_size: impl Into<Size>,
        selected_color: impl Into<String>,
        quantity: i64,
    ) -> bool {
        let key = LineItemKey::new(product_id, selected_size, selected_color);
        self.update_line(&key, quantity)
    }

    /// Sets the quantity of the line with this identity key.
    pub fn update_line(&self, key: &LineItemKey, quantity: i64) -> bool {
        self.mutate("update_quantity", |cart| cart.update_quantity(key, quantity))
    }

    /// Empties the cart.
    pub fn clear_cart(&self) -> bool {
        self.mutate("clear_cart", Cart::clear)
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Executes a function with read access to the current cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = store.with_cart(|cart| CartTotals::from(cart));
    /// ```
    ///
    /// Keep `f` short: mutations wait while it runs.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.inner.state.borrow();
        f(&cart)
    }

    /// Snapshot of the current line items in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.with_cart(|cart| cart.items().to_vec())
    }

    /// Looks up one line by identity key.
    pub fn get(&self, key: &LineItemKey) -> Option<LineItem> {
        self.with_cart(|cart| cart.get(key).cloned())
    }

    /// Sum of all line quantities.
    pub fn total_items(&self) -> i64 {
        self.with_cart(Cart::total_items)
    }

    /// Sum of price × quantity over all lines.
    pub fn total_price(&self) -> Money {
        self.with_cart(Cart::total_price)
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    // -------------------------------------------------------------------------
    // Subscription
    // -------------------------------------------------------------------------

    /// A receiver that observes every committed change.
    ///
    /// The receiver starts with the current cart marked as seen.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Committed changes as a stream (the current cart is not replayed).
    pub fn changes(&self) -> WatchStream<Cart> {
        WatchStream::from_changes(self.subscribe())
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Waits until every change made so far has been handed to storage.
    ///
    /// Returns immediately once the writer has stopped.
    pub async fn flush(&self) {
        let (done, ack) = oneshot::channel();
        if self.inner.persist.send(PersistCommand::Flush(done)).is_err() {
            return;
        }
        let _ = ack.await;
    }

    /// Writes pending changes and stops the persistence writer.
    ///
    /// The store stays usable afterwards, but changes are no longer
    /// persisted.
    pub async fn shutdown(&self) {
        let _ = self.inner.persist.send(PersistCommand::Shutdown);

        let writer = self.inner.writer.lock().ok().and_then(|mut guard| guard.take());
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                warn!(error = %e, "Cart persistence writer ended abnormally");
            }
            info!(key = %self.inner.storage_key, "Cart store shut down");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
