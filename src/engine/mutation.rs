use chrono::{DateTime, Utc};

use crate::{
    error::{InventoryError, InventoryResult},
    history::{HistoryDraft, HistoryEntry},
    persist::InventoryStore,
    product::{ProductDraft, ProductInput},
    types::ProductId,
};

/// Confirmation of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// History row appended by this update, if stock moved.
    pub history: Option<HistoryEntry>,
}

/// Inserts a new product with status derived from its initial stock.
///
/// No history is written: there is no prior quantity to compare against.
pub fn create_product<S>(store: &mut S, input: ProductInput) -> InventoryResult<ProductId>
where
    S: InventoryStore + ?Sized,
{
    let draft = ProductDraft::from(input.validate()?);
    let id = store.insert_product(&draft)?;
    log::debug!("created product {id} ({}) with stock {}", draft.name, draft.stock);
    Ok(id)
}

/// Replaces every attribute of product `id` and records the stock transition.
///
/// Input is validated before the store is touched. The replacement row and
/// the optional history entry are written through
/// [`InventoryStore::commit_update`], so they land together or not at all.
pub fn update_product<S>(
    store: &mut S,
    id: ProductId,
    input: ProductInput,
    now: DateTime<Utc>,
) -> InventoryResult<UpdateOutcome>
where
    S: InventoryStore + ?Sized,
{
    let attrs = input.validate()?;
    let current = store.get_product(id)?.ok_or(InventoryError::NotFound(id))?;

    let history = HistoryDraft::for_update(id, current.stock, attrs.stock, now);
    let replacement = attrs.into_product(id);
    let entry = store.commit_update(&replacement, history.as_ref())?;

    if let Some(entry) = &entry {
        log::debug!(
            "product {id} stock {} -> {} (history {})",
            entry.old_quantity,
            entry.new_quantity,
            entry.id
        );
    }
    Ok(UpdateOutcome { history: entry })
}

/// Removes product `id`. Its history rows are left in place.
pub fn delete_product<S>(store: &mut S, id: ProductId) -> InventoryResult<()>
where
    S: InventoryStore + ?Sized,
{
    if !store.delete_product(id)? {
        return Err(InventoryError::NotFound(id));
    }
    log::debug!("deleted product {id}");
    Ok(())
}
