//! Runtime event stream payloads.

use crate::{
    engine::import::ImportSummary,
    types::{ProductId, Quantity},
};

/// Events emitted by the single writer after a mutation commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    /// A product was created.
    Created {
        /// New product id.
        id: ProductId,
    },
    /// A product was replaced.
    Updated {
        /// Updated product id.
        id: ProductId,
    },
    /// An update moved the stock level and appended history.
    StockChanged {
        /// Updated product id.
        id: ProductId,
        /// Stock before the update.
        old_quantity: Quantity,
        /// Stock after the update.
        new_quantity: Quantity,
    },
    /// A product was deleted.
    Deleted {
        /// Deleted product id.
        id: ProductId,
    },
    /// An import batch finished.
    Imported {
        /// Batch tally.
        summary: ImportSummary,
    },
}
