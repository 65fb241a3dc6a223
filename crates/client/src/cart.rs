//! Cart reconciliation: an optimistic local cart mirrored to the server.
//!
//! The server-side cart (`/api/users/temp-data`) has no partial-update
//! semantics, so every write replaces the whole snapshot. To keep the UI
//! responsive without a network call per stepper tap, quantity edits update
//! local state immediately and arm a debounce window; the write that
//! eventually goes out carries the snapshot as it stands at dispatch time,
//! so a burst of edits costs one request.
//!
//! Each cart moves through three phases:
//!
//! - `Idle` - local state matches the last known server state
//! - `Dirty` - a mutation occurred, a debounce timer is armed, nothing sent
//! - `Writing` - the window elapsed and a snapshot write is in flight
//!
//! A mutation that lands while a timer is still armed aborts that timer and
//! re-arms: the stale payload is never sent. A mutation that lands while a
//! write is already in flight does not block and does not cancel it; the
//! in-flight response only confirms persistence and is never applied onto
//! newer local state.
//!
//! Removals are deliberate and rarer, so they skip the debounce and write
//! immediately; a failed removal is rolled back by re-fetching the server
//! cart, because an item silently reappearing is less surprising than an
//! explicitly removed item quietly persisting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::instrument;

use crate::api::types::{CartDto, CartEntryDto, FoodStoreDto};
use crate::api::{ApiClient, ApiError};

/// Debounce window between the last quantity edit and the snapshot write.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Fallback display name for a line whose snapshot lacks a food name.
const UNNAMED_ITEM: &str = "Unknown item";

// =============================================================================
// Backend abstraction
// =============================================================================

/// The remote cart resource, as the reconciliation logic sees it.
///
/// Implemented by [`ApiClient`] over the temp-data endpoints; tests provide
/// canned implementations.
pub trait CartBackend: Send + Sync + 'static {
    /// Fetch the current server-side snapshot.
    fn fetch(&self) -> impl Future<Output = Result<CartDto, ApiError>> + Send;

    /// Replace the server-side snapshot wholesale.
    fn replace(&self, snapshot: CartDto) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Clear the server-side cart.
    fn clear(&self) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl CartBackend for ApiClient {
    async fn fetch(&self) -> Result<CartDto, ApiError> {
        self.fetch_cart().await
    }

    async fn replace(&self, snapshot: CartDto) -> Result<(), ApiError> {
        self.store_cart(&snapshot).await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.clear_cart().await
    }
}

// =============================================================================
// Local state
// =============================================================================

/// One locally-held cart line.
///
/// Display fields are denormalized from the nested food/store snapshot when
/// the line enters the cart; rendering a line never needs another request.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// Units of this item. Always positive; a line at zero is removed.
    pub quantity: u32,
    /// The food-store offer this line refers to, kept for write-back.
    pub food_store: FoodStoreDto,
    /// Display name of the food.
    pub name: String,
    /// Display image, if the snapshot has one.
    pub image: Option<String>,
    /// Store-specific unit price.
    pub unit_price: Decimal,
}

impl CartLine {
    fn new(food_store: &FoodStoreDto, quantity: u32) -> Self {
        let food = food_store.food.as_ref();
        Self {
            quantity,
            name: food
                .and_then(|f| f.name.clone())
                .unwrap_or_else(|| UNNAMED_ITEM.to_string()),
            image: food.and_then(|f| f.image_src.clone()),
            unit_price: food_store.price,
            food_store: food_store.clone(),
        }
    }

    /// `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Reconciliation phase of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Local state matches the last known server state.
    Idle,
    /// A mutation occurred; a debounce timer is armed.
    Dirty,
    /// A snapshot write is in flight.
    Writing,
}

/// Non-blocking notices for the UI layer.
///
/// Background failures never propagate as errors out of the mutation that
/// caused them; they surface here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    /// A debounced snapshot write landed.
    Synced,
    /// A debounced snapshot write failed. Local edits are kept; the next
    /// mutation's write carries them again.
    SyncFailed { message: String },
    /// A removal was persisted.
    Removed { key: String },
    /// A removal failed. When `rolled_back` the line is back in local state.
    RemoveFailed {
        key: String,
        message: String,
        rolled_back: bool,
    },
}

struct CartState {
    lines: HashMap<String, CartLine>,
    phase: SyncPhase,
    /// Monotonic mutation counter. A debounce task only dispatches if the
    /// epoch it captured is still current, so superseded timers are inert
    /// even if their abort races the wakeup.
    epoch: u64,
    /// Abort handle of the armed (still sleeping) debounce timer. Cleared
    /// when the timer transitions to dispatch; an in-flight write is never
    /// aborted through this.
    pending: Option<AbortHandle>,
}

struct CartSyncInner<B> {
    backend: B,
    debounce: Duration,
    state: Mutex<CartState>,
    notices: mpsc::UnboundedSender<CartNotice>,
}

impl<B> CartSyncInner<B> {
    fn lock(&self) -> MutexGuard<'_, CartState> {
        // The lock is never held across an await, so poison can only mean a
        // panic mid-update in another task; the state is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_locked(state: &CartState) -> CartDto {
        CartDto {
            order_list: state
                .lines
                .iter()
                .map(|(key, line)| {
                    (
                        key.clone(),
                        CartEntryDto {
                            quantity: line.quantity,
                            food_store: Some(line.food_store.clone()),
                        },
                    )
                })
                .collect(),
        }
    }
}

// =============================================================================
// CartSync
// =============================================================================

/// A locally-editable cart kept eventually consistent with the server.
///
/// Cheaply cloneable; clones share state, so the cart page and the header
/// badge observe the same lines. Requires a tokio runtime (debounce timers
/// are spawned tasks).
pub struct CartSync<B: CartBackend> {
    inner: Arc<CartSyncInner<B>>,
}

impl<B: CartBackend> Clone for CartSync<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: CartBackend> CartSync<B> {
    /// Create a cart with the default debounce window.
    ///
    /// Returns the cart and the receiver for its [`CartNotice`] stream.
    #[must_use]
    pub fn new(backend: B) -> (Self, mpsc::UnboundedReceiver<CartNotice>) {
        Self::with_debounce(backend, DEBOUNCE_WINDOW)
    }

    /// Create a cart with an explicit debounce window (tests shrink it or
    /// drive it with paused time).
    #[must_use]
    pub fn with_debounce(
        backend: B,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<CartNotice>) {
        let (notices, receiver) = mpsc::unbounded_channel();
        let cart = Self {
            inner: Arc::new(CartSyncInner {
                backend,
                debounce,
                state: Mutex::new(CartState {
                    lines: HashMap::new(),
                    phase: SyncPhase::Idle,
                    epoch: 0,
                    pending: None,
                }),
                notices,
            }),
        };
        (cart, receiver)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Lines in key order (stable for rendering).
    #[must_use]
    pub fn lines(&self) -> Vec<(String, CartLine)> {
        let state = self.inner.lock();
        let mut lines: Vec<_> = state
            .lines
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        lines.sort_by(|a, b| a.0.cmp(&b.0));
        lines
    }

    /// Quantity of a line, 0 when absent.
    #[must_use]
    pub fn quantity(&self, key: &str) -> u32 {
        self.inner
            .lock()
            .lines
            .get(key)
            .map_or(0, |line| line.quantity)
    }

    /// Whether a line is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.lock().lines.contains_key(key)
    }

    /// Sum of `quantity * unit_price` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.inner
            .lock()
            .lines
            .values()
            .map(CartLine::line_total)
            .sum()
    }

    /// Total number of units across all lines (header badge).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.inner
            .lock()
            .lines
            .values()
            .map(|line| line.quantity)
            .sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().lines.is_empty()
    }

    /// Current reconciliation phase.
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.inner.lock().phase
    }

    /// The full local snapshot, as a write would send it.
    #[must_use]
    pub fn snapshot(&self) -> CartDto {
        CartSyncInner::<B>::snapshot_locked(&self.inner.lock())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace local state with the server-side cart.
    ///
    /// Any armed debounce timer is superseded; its stale payload would
    /// otherwise overwrite what was just fetched.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; local state is untouched on failure.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let dto = self.inner.backend.fetch().await?;

        let mut state = self.inner.lock();
        if let Some(timer) = state.pending.take() {
            timer.abort();
        }
        state.epoch += 1;
        state.phase = SyncPhase::Idle;
        state.lines = denormalize(&dto);
        Ok(())
    }

    /// Adjust a line's quantity by `delta`, creating the line if needed.
    ///
    /// The new quantity is `max(0, current + delta)`; reaching zero behaves
    /// exactly like [`remove`](Self::remove). Otherwise the local map is
    /// updated immediately and the debounce window is (re-)armed. Sync
    /// failures surface as [`CartNotice::SyncFailed`], keeping the
    /// optimistic edit.
    #[instrument(skip(self, item), fields(key = %item.id, delta))]
    pub async fn set_quantity(&self, item: &FoodStoreDto, delta: i64) {
        let key = item.id.to_string();

        let removed = {
            let mut state = self.inner.lock();
            let current = state.lines.get(&key).map_or(0, |line| line.quantity);
            let target = i64::from(current).saturating_add(delta).max(0);

            if target == 0 {
                true
            } else {
                let quantity = u32::try_from(target).unwrap_or(u32::MAX);
                state
                    .lines
                    .entry(key.clone())
                    .and_modify(|line| line.quantity = quantity)
                    .or_insert_with(|| CartLine::new(item, quantity));
                self.arm_debounce(&mut state);
                false
            }
        };

        if removed {
            self.remove(&key).await;
        }
    }

    /// Remove a line and persist the removal immediately.
    ///
    /// The local map is updated optimistically and any armed debounce timer
    /// is superseded. On failure the cart is re-fetched to roll the removal
    /// back, and a [`CartNotice::RemoveFailed`] is emitted.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn remove(&self, key: &str) {
        let (epoch, snapshot) = {
            let mut state = self.inner.lock();
            if state.lines.remove(key).is_none() {
                return;
            }
            if let Some(timer) = state.pending.take() {
                timer.abort();
            }
            state.epoch += 1;
            state.phase = SyncPhase::Writing;
            (state.epoch, CartSyncInner::<B>::snapshot_locked(&state))
        };

        match self.inner.backend.replace(snapshot).await {
            Ok(()) => {
                let mut state = self.inner.lock();
                if state.epoch == epoch {
                    state.phase = SyncPhase::Idle;
                }
                drop(state);
                self.notify(CartNotice::Removed {
                    key: key.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cart removal failed, rolling back");
                let rolled_back = self.rollback(epoch).await;
                self.notify(CartNotice::RemoveFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                    rolled_back,
                });
            }
        }
    }

    /// Empty the cart locally and clear the server-side resource (used after
    /// a successful checkout).
    ///
    /// # Errors
    ///
    /// Returns the clear error. Local state stays empty either way; checkout
    /// already consumed the cart.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), ApiError> {
        let epoch = {
            let mut state = self.inner.lock();
            if let Some(timer) = state.pending.take() {
                timer.abort();
            }
            state.epoch += 1;
            state.phase = SyncPhase::Writing;
            state.lines.clear();
            state.epoch
        };

        let result = self.inner.backend.clear().await;

        let mut state = self.inner.lock();
        if state.epoch == epoch {
            state.phase = SyncPhase::Idle;
        }
        drop(state);

        result
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Arm (or re-arm) the debounce timer for the current local state.
    ///
    /// An armed-but-sleeping timer is aborted and superseded. A timer that
    /// already dispatched its write is no longer in `pending` and keeps
    /// running; the epoch it captured is stale, so on completion it cannot
    /// reset a phase that newer mutations own.
    fn arm_debounce(&self, state: &mut CartState) {
        if let Some(timer) = state.pending.take() {
            timer.abort();
        }

        state.epoch += 1;
        state.phase = SyncPhase::Dirty;
        let epoch = state.epoch;

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;

            let snapshot = {
                let mut state = inner.lock();
                if state.epoch != epoch {
                    // Superseded while sleeping; the abort raced the wakeup.
                    return;
                }
                state.phase = SyncPhase::Writing;
                state.pending = None;
                CartSyncInner::<B>::snapshot_locked(&state)
            };

            let result = inner.backend.replace(snapshot).await;

            {
                let mut state = inner.lock();
                if state.epoch == epoch {
                    state.phase = SyncPhase::Idle;
                }
            }

            let notice = match result {
                Ok(()) => CartNotice::Synced,
                Err(e) => {
                    tracing::warn!(error = %e, "Cart sync failed; keeping local edits");
                    CartNotice::SyncFailed {
                        message: e.to_string(),
                    }
                }
            };
            inner.notices.send(notice).ok();
        });

        state.pending = Some(task.abort_handle());
    }

    /// Roll local state back to the server's cart after a failed removal.
    ///
    /// Returns whether the rollback fetch succeeded.
    async fn rollback(&self, epoch: u64) -> bool {
        match self.inner.backend.fetch().await {
            Ok(dto) => {
                let mut state = self.inner.lock();
                state.lines = denormalize(&dto);
                if state.epoch == epoch {
                    state.phase = SyncPhase::Idle;
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rollback fetch failed; local state keeps the removal");
                let mut state = self.inner.lock();
                if state.epoch == epoch {
                    state.phase = SyncPhase::Idle;
                }
                false
            }
        }
    }

    fn notify(&self, notice: CartNotice) {
        // A dropped receiver just means nobody is rendering notices.
        self.inner.notices.send(notice).ok();
    }
}

/// Build the local line map from a server snapshot, attaching the display
/// fields each line needs from its embedded food/store data. Entries with no
/// food-store snapshot cannot be rendered or written back and are dropped.
fn denormalize(dto: &CartDto) -> HashMap<String, CartLine> {
    dto.order_list
        .iter()
        .filter_map(|(key, entry)| {
            let food_store = entry.food_store.as_ref()?;
            Some((key.clone(), CartLine::new(food_store, entry.quantity)))
        })
        .collect()
}
