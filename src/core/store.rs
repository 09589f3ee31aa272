use hashbrown::HashMap;

use crate::{
    history::{HistoryDraft, HistoryEntry},
    persist::{HistoryStore, InventoryStore, ProductStore, StoreError, StoreResult},
    product::{Product, ProductDraft},
    types::{HistoryId, ProductId},
};

use super::indices::{HistoryIndex, NameIndex};

/// In-memory [`InventoryStore`] with the same contract as the SQLite one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: HashMap<ProductId, Product>,
    by_name: NameIndex,
    history: HashMap<HistoryId, HistoryEntry>,
    by_product: HistoryIndex,
    next_product_id: ProductId,
    next_history_id: HistoryId,
}

impl MemoryStore {
    /// Empty store; ids start at 1.
    pub fn new() -> Self {
        Self {
            next_product_id: 1,
            next_history_id: 1,
            ..Self::default()
        }
    }

    /// Number of live products.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Number of history entries, orphans included.
    pub fn history_count(&self) -> usize {
        self.history.len()
    }

    fn sorted(&self, mut out: Vec<Product>) -> Vec<Product> {
        out.sort_by_key(|p| p.id);
        out
    }

    /// Fails when `name` belongs to a product other than `owner`.
    fn check_name(&self, name: &str, owner: Option<ProductId>) -> StoreResult<()> {
        match self.by_name.get(name) {
            Some(existing) if Some(*existing) != owner => {
                Err(StoreError::NameConflict(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    fn take_next_product_id(&mut self) -> ProductId {
        let id = self.next_product_id;
        self.next_product_id += 1;
        id
    }

    fn take_next_history_id(&mut self) -> HistoryId {
        let id = self.next_history_id;
        self.next_history_id += 1;
        id
    }

    fn push_history(&mut self, draft: &HistoryDraft) -> HistoryEntry {
        let id = self.take_next_history_id();
        let entry = HistoryEntry::from_draft(id, draft.clone());
        self.by_product.entry(entry.product_id).or_default().push(id);
        self.history.insert(id, entry.clone());
        entry
    }

    fn write_product(&mut self, product: &Product) -> StoreResult<()> {
        let old_name = self
            .products
            .get(&product.id)
            .ok_or(StoreError::MissingProduct(product.id))?
            .name
            .clone();
        self.check_name(&product.name, Some(product.id))?;

        if old_name != product.name {
            self.by_name.remove(&old_name);
            self.by_name.insert(product.name.clone(), product.id);
        }
        self.products.insert(product.id, product.clone());
        Ok(())
    }
}

impl ProductStore for MemoryStore {
    fn get_product(&self, id: ProductId) -> StoreResult<Option<Product>> {
        Ok(self.products.get(&id).cloned())
    }

    fn insert_product(&mut self, draft: &ProductDraft) -> StoreResult<ProductId> {
        self.check_name(&draft.name, None)?;
        let id = self.take_next_product_id();
        self.by_name.insert(draft.name.clone(), id);
        self.products.insert(id, Product::from_draft(id, draft.clone()));
        Ok(id)
    }

    fn replace_product(&mut self, product: &Product) -> StoreResult<()> {
        self.write_product(product)
    }

    fn delete_product(&mut self, id: ProductId) -> StoreResult<bool> {
        let Some(removed) = self.products.remove(&id) else {
            return Ok(false);
        };
        self.by_name.remove(&removed.name);
        Ok(true)
    }

    fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.sorted(self.products.values().cloned().collect()))
    }

    fn search_products(&self, query: &str, category: Option<&str>) -> StoreResult<Vec<Product>> {
        let needle = query.to_ascii_lowercase();
        let hits = self
            .products
            .values()
            .filter(|p| p.name.to_ascii_lowercase().contains(&needle))
            .filter(|p| category.is_none_or(|c| p.category.as_deref() == Some(c)))
            .cloned()
            .collect();
        Ok(self.sorted(hits))
    }

    fn list_categories(&self) -> StoreResult<Vec<String>> {
        let mut out: Vec<String> = self
            .products
            .values()
            .filter_map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }
}

impl HistoryStore for MemoryStore {
    fn append_history(&mut self, draft: &HistoryDraft) -> StoreResult<HistoryId> {
        Ok(self.push_history(draft).id)
    }

    fn history_for(&self, product_id: ProductId) -> StoreResult<Vec<HistoryEntry>> {
        let mut out: Vec<HistoryEntry> = self
            .by_product
            .get(&product_id)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(|id| self.history.get(id).cloned())
            .collect();
        out.sort_by(|a, b| b.change_date.cmp(&a.change_date).then(b.id.cmp(&a.id)));
        Ok(out)
    }
}

impl InventoryStore for MemoryStore {
    fn commit_update(
        &mut self,
        product: &Product,
        history: Option<&HistoryDraft>,
    ) -> StoreResult<Option<HistoryEntry>> {
        // Preconditions first so a failure leaves nothing behind.
        if !self.products.contains_key(&product.id) {
            return Err(StoreError::MissingProduct(product.id));
        }
        self.check_name(&product.name, Some(product.id))?;

        let entry = history.map(|draft| self.push_history(draft));
        self.write_product(product)?;
        Ok(entry)
    }
}
