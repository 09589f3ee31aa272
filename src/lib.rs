//! Product stock tracking with an append-only audit trail of quantity changes.
//!
//! # Examples
//!
//! Direct engine usage with [`core::store::MemoryStore`]:
//! ```
//! use chrono::Utc;
//! use stockledger::{
//!     core::store::MemoryStore,
//!     engine::mutation::{create_product, update_product},
//!     persist::{HistoryStore, ProductStore},
//!     product::ProductInput,
//!     types::StockStatus,
//! };
//!
//! let mut store = MemoryStore::new();
//! let id = create_product(&mut store, ProductInput::new("Widget", 5)).expect("create");
//! update_product(&mut store, id, ProductInput::new("Widget", 0), Utc::now()).expect("update");
//!
//! let widget = store.get_product(id).expect("get").expect("exists");
//! assert_eq!(widget.status, StockStatus::OutOfStock);
//! assert_eq!(store.history_for(id).expect("history").len(), 1);
//! ```
//!
//! Runtime usage with a SQLite store and bearer credentials:
//! ```no_run
//! use stockledger::{
//!     auth::{AccessGate, Principal, jwt::JwtVerifier},
//!     config::{AuthConfig, RuntimeConfig},
//!     persist::sqlite::SqliteInventoryStore,
//!     product::ProductInput,
//!     runtime::handle::spawn_inventory,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let auth = AuthConfig { secret: "change-me".to_string(), token_ttl_secs: 3600, leeway_secs: 0 };
//! let jwt = JwtVerifier::new(&auth);
//! let token = jwt.issue(Principal { id: 1 }).expect("issue");
//!
//! let store = SqliteInventoryStore::open("inventory.db").expect("open sqlite");
//! let handle = spawn_inventory(store, AccessGate::new(jwt), RuntimeConfig::default());
//! let header = format!("Bearer {token}");
//! let _id = handle
//!     .create_product(Some(&header), ProductInput::new("Widget", 5))
//!     .await
//!     .expect("create");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Bearer-credential access gate.
pub mod auth;
/// Environment-driven configuration.
pub mod config;
/// In-memory store and index helpers.
pub mod core;
/// CSV row decoding and export encoding.
pub mod csv_io;
/// Status derivation, mutation, and import logic.
pub mod engine;
/// Caller-facing error taxonomy.
pub mod error;
/// Stock history records.
pub mod history;
/// Store traits and SQLite implementation.
pub mod persist;
/// Product records and caller input.
pub mod product;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
