use chrono::Utc;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use stockledger::{
    core::store::MemoryStore,
    engine::{
        import::import_rows,
        mutation::{create_product, update_product},
    },
    persist::{InventoryStore, sqlite::SqliteInventoryStore},
    product::{ImportRow, ProductInput},
};

fn rows(n: usize) -> Vec<ImportRow> {
    (0..n)
        .map(|i| {
            ImportRow::new()
                .with("name", format!("sku-{i}"))
                .with("stock", (i % 7).to_string())
                .with("category", "Bench")
        })
        .collect()
}

fn churn<S: InventoryStore>(store: &mut S, products: i64, rounds: i64) {
    for i in 0..products {
        create_product(store, ProductInput::new(format!("W{i}"), 1)).expect("create");
    }
    for round in 0..rounds {
        for id in 1..=products {
            update_product(store, id, ProductInput::new(format!("W{}", id - 1), round % 3), Utc::now())
                .expect("update");
        }
    }
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_rows");
    for n in [100usize, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("memory", n), &n, |b, &n| {
            b.iter(|| {
                let mut store = MemoryStore::new();
                import_rows(&mut store, rows(n))
            });
        });
    }
    group.bench_function("sqlite_1000", |b| {
        b.iter(|| {
            let mut store = SqliteInventoryStore::open_in_memory().expect("open");
            import_rows(&mut store, rows(1_000))
        });
    });
    group.finish();
}

fn bench_updates(c: &mut Criterion) {
    c.bench_function("memory_update_with_history_10k", |b| {
        b.iter(|| {
            let mut store = MemoryStore::new();
            churn(&mut store, 1_000, 10);
        });
    });
    c.bench_function("sqlite_update_with_history_2k", |b| {
        b.iter(|| {
            let mut store = SqliteInventoryStore::open_in_memory().expect("open");
            churn(&mut store, 200, 10);
        });
    });
}

criterion_group!(benches, bench_import, bench_updates);
criterion_main!(benches);
