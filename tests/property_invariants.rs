use chrono::Utc;
use hashbrown::HashMap;
use proptest::prelude::*;

use stockledger::{
    core::store::MemoryStore,
    engine::{
        mutation::{create_product, update_product},
        status::derive_status,
    },
    error::InventoryError,
    persist::{HistoryStore, InventoryStore, ProductStore, sqlite::SqliteInventoryStore},
    product::ProductInput,
    types::{ProductId, StockStatus},
};

#[derive(Debug, Clone)]
enum Action {
    Create { name_idx: u8, stock: i16 },
    Update { target: u8, name_idx: u8, stock: i16 },
    UpdateMissing { stock: i16 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..16, -20i16..20).prop_map(|(name_idx, stock)| Action::Create { name_idx, stock }),
        (0u8..16, 0u8..16, -20i16..20)
            .prop_map(|(target, name_idx, stock)| Action::Update { target, name_idx, stock }),
        (-20i16..20).prop_map(|stock| Action::UpdateMissing { stock }),
    ]
}

fn name(idx: u8) -> String {
    format!("item-{idx}")
}

/// Replays `actions` and checks the status and history invariants after
/// every step.
fn check_sequence<S: InventoryStore>(store: &mut S, actions: Vec<Action>) -> Result<(), TestCaseError> {
    let mut ids: Vec<ProductId> = Vec::new();
    let mut expected_history: HashMap<ProductId, usize> = HashMap::new();

    for action in actions {
        match action {
            Action::Create { name_idx, stock } => {
                if let Ok(id) = create_product(store, ProductInput::new(name(name_idx), i64::from(stock))) {
                    ids.push(id);
                    expected_history.insert(id, 0);
                }
            }
            Action::Update { target, name_idx, stock } => {
                if ids.is_empty() {
                    continue;
                }
                let id = ids[usize::from(target) % ids.len()];
                let before = store.get_product(id).expect("get").expect("exists").stock;
                let res = update_product(
                    store,
                    id,
                    ProductInput::new(name(name_idx), i64::from(stock)),
                    Utc::now(),
                );
                match res {
                    Ok(outcome) => {
                        let moved = before != i64::from(stock);
                        prop_assert_eq!(outcome.history.is_some(), moved);
                        if moved {
                            *expected_history.entry(id).or_default() += 1;
                            let entry = outcome.history.expect("entry");
                            prop_assert_eq!(entry.old_quantity, before);
                            prop_assert_eq!(entry.new_quantity, i64::from(stock));
                        }
                    }
                    Err(InventoryError::Conflict(_)) => {
                        let after = store.get_product(id).expect("get").expect("exists").stock;
                        prop_assert_eq!(after, before);
                    }
                    Err(other) => prop_assert!(false, "unexpected update error: {other:?}"),
                }
            }
            Action::UpdateMissing { stock } => {
                let res = update_product(store, 10_000, ProductInput::new("ghost", i64::from(stock)), Utc::now());
                prop_assert!(matches!(res, Err(InventoryError::NotFound(10_000))));
                prop_assert!(store.history_for(10_000).expect("history").is_empty());
            }
        }

        for product in store.list_products().expect("list") {
            prop_assert_eq!(product.status == StockStatus::InStock, product.stock > 0);
        }
        for (id, count) in &expected_history {
            prop_assert_eq!(store.history_for(*id).expect("history").len(), *count);
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn status_tracks_stock_for_every_integer(q in any::<i64>()) {
        prop_assert_eq!(derive_status(q) == StockStatus::InStock, q > 0);
    }

    #[test]
    fn memory_store_keeps_status_and_history_invariants(actions in prop::collection::vec(action_strategy(), 1..120)) {
        let mut store = MemoryStore::new();
        check_sequence(&mut store, actions)?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sqlite_store_keeps_status_and_history_invariants(actions in prop::collection::vec(action_strategy(), 1..60)) {
        let mut store = SqliteInventoryStore::open_in_memory().expect("open");
        check_sequence(&mut store, actions)?;
    }
}
