//! Cart reconciliation scenarios driven with paused tokio time.
//!
//! Time never passes for real here: `start_paused` makes the debounce
//! windows deterministic, so these tests assert exact write counts and
//! payloads for each interleaving.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rust_decimal::Decimal;
use uuid::Uuid;

use mealdash_client::api::ApiError;
use mealdash_client::api::types::{CartDto, CartEntryDto, FoodDto, FoodStoreDto};
use mealdash_client::cart::{CartBackend, CartNotice, CartSync, SyncPhase};
use mealdash_core::{FoodId, FoodTypeId, StoreId};

// =============================================================================
// Mock backend
// =============================================================================

#[derive(Default)]
struct MockState {
    fetch_result: CartDto,
    writes: Vec<CartDto>,
    fail_writes: bool,
    write_delay: Duration,
    clears: u32,
}

/// Canned cart backend recording every snapshot write.
#[derive(Clone, Default)]
struct MockCart {
    state: Arc<Mutex<MockState>>,
}

impl MockCart {
    fn new() -> Self {
        Self::default()
    }

    fn set_fetch_result(&self, dto: CartDto) {
        self.state.lock().unwrap().fetch_result = dto;
    }

    fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    fn set_write_delay(&self, delay: Duration) {
        self.state.lock().unwrap().write_delay = delay;
    }

    fn writes(&self) -> Vec<CartDto> {
        self.state.lock().unwrap().writes.clone()
    }

    fn clears(&self) -> u32 {
        self.state.lock().unwrap().clears
    }
}

impl CartBackend for MockCart {
    async fn fetch(&self) -> Result<CartDto, ApiError> {
        let dto = self.state.lock().unwrap().fetch_result.clone();
        Ok(dto)
    }

    async fn replace(&self, snapshot: CartDto) -> Result<(), ApiError> {
        let (delay, fail) = {
            let state = self.state.lock().unwrap();
            (state.write_delay, state.fail_writes)
        };

        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }

        self.state.lock().unwrap().writes.push(snapshot);

        if fail {
            Err(ApiError::Api {
                status: 500,
                message: "temp-data write rejected".to_string(),
            })
        } else {
            Ok(())
        }
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.state.lock().unwrap().clears += 1;
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn offer(seed: u128, name: &str, price: i64) -> FoodStoreDto {
    FoodStoreDto {
        id: Uuid::from_u128(seed),
        store_id: StoreId::new(1),
        store: None,
        food_id: FoodId::new(seed as i32),
        food: Some(FoodDto {
            id: FoodId::new(seed as i32),
            name: Some(name.to_string()),
            food_type_id: FoodTypeId::new(1),
            food_type_name: None,
            image_src: Some(format!("https://cdn.mealdash.example/{name}.jpg")),
            is_available: true,
            price: Some(Decimal::from(price)),
        }),
        price: Decimal::from(price),
    }
}

fn key_of(item: &FoodStoreDto) -> String {
    item.id.to_string()
}

fn cart_with(entries: &[(&FoodStoreDto, u32)]) -> CartDto {
    let order_list: HashMap<String, CartEntryDto> = entries
        .iter()
        .map(|(item, quantity)| {
            (
                key_of(item),
                CartEntryDto {
                    quantity: *quantity,
                    food_store: Some((*item).clone()),
                },
            )
        })
        .collect();
    CartDto { order_list }
}

/// Sleep in virtual time, letting armed timers fire.
async fn pass(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn first_item_in_empty_cart_issues_one_write_after_the_window() {
    let backend = MockCart::new();
    let (cart, mut notices) = CartSync::new(backend.clone());
    let pho = offer(1, "pho-bo", 45000);

    cart.set_quantity(&pho, 1).await;

    // Optimistic: local state is already updated, nothing sent yet.
    assert_eq!(cart.quantity(&key_of(&pho)), 1);
    assert_eq!(cart.phase(), SyncPhase::Dirty);
    assert!(backend.writes().is_empty());

    pass(600).await;

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    let entry = &writes[0].order_list[&key_of(&pho)];
    assert_eq!(entry.quantity, 1);
    assert!(entry.food_store.is_some());

    assert_eq!(cart.phase(), SyncPhase::Idle);
    assert_eq!(notices.recv().await, Some(CartNotice::Synced));
}

#[tokio::test(start_paused = true)]
async fn rapid_decrements_coalesce_into_one_write_with_the_final_quantity() {
    let backend = MockCart::new();
    let pho = offer(1, "pho-bo", 45000);
    backend.set_fetch_result(cart_with(&[(&pho, 3)]));

    let (cart, _notices) = CartSync::new(backend.clone());
    cart.refresh().await.unwrap();

    cart.set_quantity(&pho, -1).await;
    pass(100).await;
    cart.set_quantity(&pho, -1).await;

    assert_eq!(cart.quantity(&key_of(&pho)), 1);

    pass(700).await;

    // Not a write per tap, and never the intermediate quantity 2.
    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].order_list[&key_of(&pho)].quantity, 1);
}

#[tokio::test(start_paused = true)]
async fn final_quantity_is_initial_plus_sum_of_deltas() {
    let backend = MockCart::new();
    let (cart, _notices) = CartSync::new(backend.clone());
    let banh_mi = offer(2, "banh-mi", 25000);

    for delta in [3, -1, 2, -1] {
        cart.set_quantity(&banh_mi, delta).await;
        pass(100).await;
    }

    assert_eq!(cart.quantity(&key_of(&banh_mi)), 3);

    pass(600).await;

    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].order_list[&key_of(&banh_mi)].quantity, 3);
}

#[tokio::test(start_paused = true)]
async fn driving_quantity_to_zero_removes_the_line_immediately() {
    let backend = MockCart::new();
    let pho = offer(1, "pho-bo", 45000);
    backend.set_fetch_result(cart_with(&[(&pho, 1)]));

    let (cart, mut notices) = CartSync::new(backend.clone());
    cart.refresh().await.unwrap();

    cart.set_quantity(&pho, -1).await;

    // Equivalent to remove: key gone, write issued without a debounce.
    assert!(!cart.contains(&key_of(&pho)));
    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].order_list.is_empty());
    assert_eq!(
        notices.recv().await,
        Some(CartNotice::Removed {
            key: key_of(&pho)
        })
    );
}

#[tokio::test(start_paused = true)]
async fn failed_removal_rolls_back_by_refetching() {
    let backend = MockCart::new();
    let pho = offer(1, "pho-bo", 45000);
    backend.set_fetch_result(cart_with(&[(&pho, 2)]));

    let (cart, mut notices) = CartSync::new(backend.clone());
    cart.refresh().await.unwrap();

    backend.fail_writes(true);
    cart.remove(&key_of(&pho)).await;

    // The line is restored from the server's snapshot.
    assert_eq!(cart.quantity(&key_of(&pho)), 2);
    match notices.recv().await {
        Some(CartNotice::RemoveFailed {
            key, rolled_back, ..
        }) => {
            assert_eq!(key, key_of(&pho));
            assert!(rolled_back);
        }
        other => panic!("expected RemoveFailed, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn failed_sync_keeps_optimistic_edits_and_notifies() {
    let backend = MockCart::new();
    backend.fail_writes(true);

    let (cart, mut notices) = CartSync::new(backend.clone());
    let pho = offer(1, "pho-bo", 45000);

    cart.set_quantity(&pho, 1).await;
    pass(600).await;

    // The edit is not reverted; the next mutation's write will retry it.
    assert_eq!(cart.quantity(&key_of(&pho)), 1);
    assert_eq!(backend.writes().len(), 1);
    assert!(matches!(
        notices.recv().await,
        Some(CartNotice::SyncFailed { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn mutation_during_inflight_write_debounces_independently() {
    let backend = MockCart::new();
    backend.set_write_delay(Duration::from_millis(300));

    let (cart, _notices) = CartSync::new(backend.clone());
    let pho = offer(1, "pho-bo", 45000);

    // t=0: first edit arms the window; dispatch at t=500, lands at t=800.
    cart.set_quantity(&pho, 1).await;
    pass(550).await;
    assert_eq!(cart.phase(), SyncPhase::Writing);

    // t=550: a new edit while the write is in flight. It does not cancel the
    // write and is not blocked by it; it arms its own window.
    cart.set_quantity(&pho, 1).await;
    assert_eq!(cart.phase(), SyncPhase::Dirty);

    pass(1100).await;

    // Both writes landed: the in-flight one with its dispatch-time snapshot,
    // then the follow-up with the newer quantity.
    let writes = backend.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].order_list[&key_of(&pho)].quantity, 1);
    assert_eq!(writes[1].order_list[&key_of(&pho)].quantity, 2);

    // The first write's result was only a persistence confirmation; it never
    // clobbered the newer local state.
    assert_eq!(cart.quantity(&key_of(&pho)), 2);
    assert_eq!(cart.phase(), SyncPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn removal_supersedes_an_armed_quantity_write() {
    let backend = MockCart::new();
    let pho = offer(1, "pho-bo", 45000);
    let banh_mi = offer(2, "banh-mi", 25000);
    backend.set_fetch_result(cart_with(&[(&pho, 2), (&banh_mi, 1)]));

    let (cart, _notices) = CartSync::new(backend.clone());
    cart.refresh().await.unwrap();

    cart.set_quantity(&pho, 1).await;
    pass(100).await;
    cart.remove(&key_of(&banh_mi)).await;
    pass(600).await;

    // The armed timer was cancelled; the removal's immediate write already
    // carries the newer quantity, so no second (stale) write goes out.
    let writes = backend.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].order_list[&key_of(&pho)].quantity, 3);
    assert!(!writes[0].order_list.contains_key(&key_of(&banh_mi)));
}

#[tokio::test(start_paused = true)]
async fn refresh_replaces_the_whole_local_map() {
    let backend = MockCart::new();
    let pho = offer(1, "pho-bo", 45000);
    let banh_mi = offer(2, "banh-mi", 25000);
    backend.set_fetch_result(cart_with(&[(&pho, 2), (&banh_mi, 1)]));

    let (cart, _notices) = CartSync::new(backend.clone());
    cart.refresh().await.unwrap();

    let lines = cart.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal(), Decimal::from(2 * 45000 + 25000));

    // Display fields come from the embedded snapshot, no extra requests.
    let (_, pho_line) = lines
        .iter()
        .find(|(key, _)| *key == key_of(&pho))
        .unwrap();
    assert_eq!(pho_line.name, "pho-bo");
    assert_eq!(pho_line.unit_price, Decimal::from(45000));

    // A later fetch wins wholesale; stale local keys do not linger.
    backend.set_fetch_result(cart_with(&[(&banh_mi, 5)]));
    cart.refresh().await.unwrap();
    assert!(!cart.contains(&key_of(&pho)));
    assert_eq!(cart.quantity(&key_of(&banh_mi)), 5);
}

#[tokio::test(start_paused = true)]
async fn clear_empties_local_state_and_hits_the_clear_endpoint() {
    let backend = MockCart::new();
    let pho = offer(1, "pho-bo", 45000);
    backend.set_fetch_result(cart_with(&[(&pho, 2)]));

    let (cart, _notices) = CartSync::new(backend.clone());
    cart.refresh().await.unwrap();

    cart.clear().await.unwrap();

    assert!(cart.is_empty());
    assert_eq!(backend.clears(), 1);
    assert_eq!(cart.phase(), SyncPhase::Idle);
}
