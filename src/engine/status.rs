use crate::types::{Quantity, StockStatus};

/// Maps a quantity to its availability label.
pub fn derive_status(quantity: Quantity) -> StockStatus {
    if quantity > 0 {
        StockStatus::InStock
    } else {
        StockStatus::OutOfStock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_positive_quantities_are_in_stock() {
        assert_eq!(derive_status(1), StockStatus::InStock);
        assert_eq!(derive_status(i64::MAX), StockStatus::InStock);
        assert_eq!(derive_status(0), StockStatus::OutOfStock);
        assert_eq!(derive_status(-1), StockStatus::OutOfStock);
        assert_eq!(derive_status(i64::MIN), StockStatus::OutOfStock);
    }
}
