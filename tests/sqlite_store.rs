use chrono::{Duration, Utc};
use tempfile::TempDir;

use stockledger::{
    engine::mutation::{create_product, delete_product, update_product},
    persist::{HistoryStore, ProductStore, sqlite::SqliteInventoryStore},
    product::ProductInput,
    types::{ActionType, StockStatus},
};

fn input(name: &str, stock: i64, category: Option<&str>) -> ProductInput {
    ProductInput {
        category: category.map(str::to_string),
        ..ProductInput::new(name, stock)
    }
}

#[test]
fn products_and_history_survive_reopen() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("inventory.db");
    let t0 = Utc::now();

    let id = {
        let mut store = SqliteInventoryStore::open(&db_path).expect("open sqlite");
        let id = create_product(&mut store, input("Widget", 5, Some("Tools"))).expect("create");
        update_product(&mut store, id, input("Widget", 0, Some("Tools")), t0).expect("update 1");
        update_product(&mut store, id, input("Widget", 0, Some("Hardware")), t0 + Duration::seconds(1))
            .expect("update 2");
        update_product(&mut store, id, input("Widget", 12, Some("Hardware")), t0 + Duration::seconds(2))
            .expect("update 3");
        id
    };

    let store = SqliteInventoryStore::open(&db_path).expect("reopen");
    let product = store.get_product(id).expect("get").expect("exists");
    assert_eq!(product.stock, 12);
    assert_eq!(product.status, StockStatus::InStock);
    assert_eq!(product.category.as_deref(), Some("Hardware"));

    let history = store.history_for(id).expect("history");
    let transitions: Vec<(i64, i64)> = history
        .iter()
        .map(|h| (h.old_quantity, h.new_quantity))
        .collect();
    assert_eq!(transitions, vec![(0, 12), (5, 0)]);
    assert!(history.iter().all(|h| h.action_type == ActionType::Update && h.product_id == id));
    assert_eq!(history[1].change_date.timestamp_micros(), t0.timestamp_micros());
}

#[test]
fn deleted_product_leaves_history_readable() {
    let tmp = TempDir::new().expect("tmp");
    let mut store = SqliteInventoryStore::open(tmp.path().join("orphans.db")).expect("open sqlite");

    let id = create_product(&mut store, input("Bolt", 3, None)).expect("create");
    update_product(&mut store, id, input("Bolt", 1, None), Utc::now()).expect("update");
    delete_product(&mut store, id).expect("delete");

    assert_eq!(store.get_product(id).expect("get"), None);
    assert_eq!(store.history_for(id).expect("history").len(), 1);

    let again = create_product(&mut store, input("Bolt", 0, None)).expect("name free again");
    assert_ne!(again, id);
    assert!(store.history_for(again).expect("history").is_empty());
}

#[test]
fn listing_search_and_categories() {
    let mut store = SqliteInventoryStore::open_in_memory().expect("open");
    for (name, cat) in [("Red Pen", Some("Office")), ("Blue pen", Some("Office")), ("Hammer", Some("Tools")), ("Tape", None)] {
        create_product(&mut store, input(name, 1, cat)).expect("create");
    }

    let names: Vec<String> = store
        .list_products()
        .expect("list")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Red Pen", "Blue pen", "Hammer", "Tape"]);

    let pens: Vec<String> = store
        .search_products("PEN", None)
        .expect("search")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(pens, vec!["Red Pen", "Blue pen"]);
    assert_eq!(store.search_products("", None).expect("search all").len(), 4);
    assert!(store.search_products("drill", None).expect("search none").is_empty());

    assert_eq!(store.list_categories().expect("categories"), vec!["Office", "Tools"]);
}

#[test]
fn search_combines_name_and_category() {
    let mut store = SqliteInventoryStore::open_in_memory().expect("open");
    for (name, cat) in [("Red Pen", Some("Office")), ("Pen Holder", Some("Tools")), ("pencil", None)] {
        create_product(&mut store, input(name, 1, cat)).expect("create");
    }
    let names = |query: &str, category: Option<&str>| -> Vec<String> {
        store
            .search_products(query, category)
            .expect("search")
            .into_iter()
            .map(|p| p.name)
            .collect()
    };

    assert_eq!(names("pen", None), vec!["Red Pen", "Pen Holder", "pencil"]);
    assert_eq!(names("PEN", Some("Tools")), vec!["Pen Holder"]);
    assert_eq!(names("", Some("Office")), vec!["Red Pen"]);
    assert!(names("pen", Some("office")).is_empty());
    assert!(names("hammer", Some("Tools")).is_empty());
}

#[test]
fn negative_stock_is_stored_out_of_stock() {
    let mut store = SqliteInventoryStore::open_in_memory().expect("open");
    let id = create_product(&mut store, input("Backorder", -4, None)).expect("create");
    let product = store.get_product(id).expect("get").expect("exists");
    assert_eq!(product.stock, -4);
    assert_eq!(product.status, StockStatus::OutOfStock);
}
