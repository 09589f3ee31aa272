use hashbrown::HashMap;

use crate::types::{HistoryId, ProductId};

/// Product name to owning id.
pub type NameIndex = HashMap<String, ProductId>;
/// History ids per product, in append order.
pub type HistoryIndex = HashMap<ProductId, Vec<HistoryId>>;
