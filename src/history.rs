//! Append-only stock history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActionType, HistoryId, ProductId, Quantity};

/// Immutable record of one stock transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Store-assigned identifier.
    pub id: HistoryId,
    /// Product the transition belongs to. May outlive the product.
    pub product_id: ProductId,
    /// Stock before the update.
    pub old_quantity: Quantity,
    /// Stock after the update.
    pub new_quantity: Quantity,
    /// When the update was applied.
    pub change_date: DateTime<Utc>,
    /// Kind of transition.
    pub action_type: ActionType,
}

impl HistoryEntry {
    /// Materializes a stored entry from a draft and its assigned id.
    pub fn from_draft(id: HistoryId, draft: HistoryDraft) -> Self {
        Self {
            id,
            product_id: draft.product_id,
            old_quantity: draft.old_quantity,
            new_quantity: draft.new_quantity,
            change_date: draft.change_date,
            action_type: draft.action_type,
        }
    }
}

/// Append payload for a [`HistoryEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDraft {
    /// Product the transition belongs to.
    pub product_id: ProductId,
    /// Stock before the update.
    pub old_quantity: Quantity,
    /// Stock after the update.
    pub new_quantity: Quantity,
    /// When the update was applied.
    pub change_date: DateTime<Utc>,
    /// Kind of transition.
    pub action_type: ActionType,
}

impl HistoryDraft {
    /// Returns an `Update` draft when the quantity actually moved.
    pub fn for_update(
        product_id: ProductId,
        old_quantity: Quantity,
        new_quantity: Quantity,
        change_date: DateTime<Utc>,
    ) -> Option<Self> {
        (old_quantity != new_quantity).then_some(Self {
            product_id,
            old_quantity,
            new_quantity,
            change_date,
            action_type: ActionType::Update,
        })
    }
}
