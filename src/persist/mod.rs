//! Storage seams for products and their stock history.

pub mod sqlite;

use thiserror::Error;

use crate::{
    history::{HistoryDraft, HistoryEntry},
    product::{Product, ProductDraft},
    types::{HistoryId, ProductId},
};

/// Failures raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another product already owns this name.
    #[error("name already exists: {0}")]
    NameConflict(String),
    /// The target row is gone.
    #[error("product {0} does not exist")]
    MissingProduct(ProductId),
    /// Underlying SQLite failure.
    #[error("sqlite: {0}")]
    Sqlite(rusqlite::Error),
    /// Anything else a backend wants to report.
    #[error("{0}")]
    Message(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted product rows. Name uniqueness is enforced here, not by callers.
pub trait ProductStore: Send {
    /// Point lookup by id.
    fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>>;
    /// Inserts a new row and returns its assigned id.
    fn insert_product(&mut self, draft: &ProductDraft) -> StoreResult<ProductId>;
    /// Full-row replacement keyed by `product.id`.
    fn replace_product(&mut self, product: &Product) -> StoreResult<()>;
    /// Returns `false` when nothing was deleted.
    fn delete_product(&mut self, id: ProductId) -> StoreResult<bool>;
    /// All products in ascending id order.
    fn list_products(&self) -> StoreResult<Vec<Product>>;
    /// Case-insensitive ASCII substring match on name, ascending id order.
    /// `category`, when given, must match exactly.
    fn search_products(&self, query: &str, category: Option<&str>) -> StoreResult<Vec<Product>>;
    /// Distinct non-empty categories, sorted.
    fn list_categories(&self) -> StoreResult<Vec<String>>;
}

/// Append-only audit rows.
pub trait HistoryStore: Send {
    /// Appends one entry and returns its id.
    fn append_history(&mut self, draft: &HistoryDraft) -> StoreResult<HistoryId>;
    /// Newest first by `change_date`, then by descending id.
    fn history_for(&self, product_id: ProductId) -> StoreResult<Vec<HistoryEntry>>;
}

/// Both stores behind one owner, plus the atomic update-with-audit write.
pub trait InventoryStore: ProductStore + HistoryStore {
    /// Replaces `product` and appends `history` as one unit: either both
    /// land or neither does.
    fn commit_update(
        &mut self,
        product: &Product,
        history: Option<&HistoryDraft>,
    ) -> StoreResult<Option<HistoryEntry>>;
}
