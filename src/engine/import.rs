use serde::{Deserialize, Serialize};

use crate::{persist::InventoryStore, product::ImportRow};

use super::mutation::create_product;

/// Aggregate outcome of an import batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Rows inserted.
    pub success_count: usize,
    /// Rows rejected for any reason.
    pub failed_count: usize,
}

/// Inserts `rows` one at a time in order.
///
/// Each row is committed or rejected before the next is attempted, so a
/// later duplicate of an earlier row in the same batch counts as a failure
/// and the first occurrence wins. Per-row errors only move the tally.
pub fn import_rows<S, I>(store: &mut S, rows: I) -> ImportSummary
where
    S: InventoryStore + ?Sized,
    I: IntoIterator<Item = ImportRow>,
{
    let mut summary = ImportSummary::default();
    for (idx, row) in rows.into_iter().enumerate() {
        let result = row
            .into_input()
            .and_then(|input| create_product(&mut *store, input));
        match result {
            Ok(_) => summary.success_count += 1,
            Err(err) => {
                log::debug!("import row {idx} rejected: {err}");
                summary.failed_count += 1;
            }
        }
    }
    log::info!(
        "import finished: {} inserted, {} failed",
        summary.success_count,
        summary.failed_count
    );
    summary
}
