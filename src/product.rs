//! Product record, caller input, and import row types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    engine::status::derive_status,
    error::{InventoryError, InventoryResult},
    types::{ProductId, Quantity, StockStatus},
};

/// Fully materialized, persisted product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,
    /// Unique product name.
    pub name: String,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional brand label.
    pub brand: Option<String>,
    /// Current stock level.
    pub stock: Quantity,
    /// Optional unit of measure.
    pub unit: Option<String>,
    /// Derived availability label.
    pub status: StockStatus,
    /// Opaque image reference.
    pub image: Option<String>,
}

impl Product {
    /// Materializes a stored row from a draft and its assigned id.
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            brand: draft.brand,
            stock: draft.stock,
            unit: draft.unit,
            status: draft.status,
            image: draft.image,
        }
    }
}

/// Insert payload: a product without its id, status already derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    /// Unique product name.
    pub name: String,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional brand label.
    pub brand: Option<String>,
    /// Initial stock level.
    pub stock: Quantity,
    /// Optional unit of measure.
    pub unit: Option<String>,
    /// Status derived from `stock`.
    pub status: StockStatus,
    /// Opaque image reference.
    pub image: Option<String>,
}

impl From<ProductAttrs> for ProductDraft {
    fn from(attrs: ProductAttrs) -> Self {
        Self {
            status: derive_status(attrs.stock),
            name: attrs.name,
            category: attrs.category,
            brand: attrs.brand,
            stock: attrs.stock,
            unit: attrs.unit,
            image: attrs.image,
        }
    }
}

/// Validated caller-supplied attributes. Carries no status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAttrs {
    /// Unique product name, never empty.
    pub name: String,
    /// Optional category label.
    pub category: Option<String>,
    /// Optional brand label.
    pub brand: Option<String>,
    /// Requested stock level.
    pub stock: Quantity,
    /// Optional unit of measure.
    pub unit: Option<String>,
    /// Opaque image reference.
    pub image: Option<String>,
}

impl ProductAttrs {
    /// Builds the replacement row for `id`, deriving status from stock.
    pub fn into_product(self, id: ProductId) -> Product {
        Product::from_draft(id, self.into())
    }
}

/// Stock value as received from outside, before integer coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStock {
    /// Already an integer.
    Integer(i64),
    /// JSON number with a fractional representation.
    Number(f64),
    /// Text such as a CSV cell or form field.
    Text(String),
}

impl RawStock {
    /// Coerces to an integer quantity.
    ///
    /// Text is trimmed and must parse as a base-10 `i64`. Numbers must be
    /// integral and within `i64` range.
    pub fn coerce(&self) -> InventoryResult<Quantity> {
        match self {
            Self::Integer(v) => Ok(*v),
            Self::Number(v) => {
                if v.is_finite() && v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                    Ok(*v as i64)
                } else {
                    Err(InventoryError::InvalidInput(format!(
                        "stock must be an integer, got {v}"
                    )))
                }
            }
            Self::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                InventoryError::InvalidInput(format!("stock must be an integer, got {s:?}"))
            }),
        }
    }
}

impl From<i64> for RawStock {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for RawStock {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Full replacement attribute set as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    /// Requested product name.
    pub name: String,
    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Optional brand label.
    #[serde(default)]
    pub brand: Option<String>,
    /// Stock value awaiting coercion.
    pub stock: RawStock,
    /// Optional unit of measure.
    #[serde(default)]
    pub unit: Option<String>,
    /// Opaque image reference.
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductInput {
    /// Convenience constructor with only the required fields set.
    pub fn new(name: impl Into<String>, stock: impl Into<RawStock>) -> Self {
        Self {
            name: name.into(),
            category: None,
            brand: None,
            stock: stock.into(),
            unit: None,
            image: None,
        }
    }

    /// Coerces stock and checks required fields.
    pub fn validate(self) -> InventoryResult<ProductAttrs> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(InventoryError::InvalidInput("name is required".to_string()));
        }
        let stock = self.stock.coerce()?;
        Ok(ProductAttrs {
            name: name.to_string(),
            category: self.category,
            brand: self.brand,
            stock,
            unit: self.unit,
            image: self.image,
        })
    }
}

/// One decoded import row: string-keyed fields in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    fields: BTreeMap<String, String>,
}

impl ImportRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets one field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Converts into caller input. `name` and `stock` are required; empty
    /// optional cells become `None`.
    pub fn into_input(mut self) -> InventoryResult<ProductInput> {
        let name = self
            .take_non_empty("name")
            .ok_or_else(|| InventoryError::InvalidInput("row is missing name".to_string()))?;
        let stock = self
            .take_non_empty("stock")
            .ok_or_else(|| InventoryError::InvalidInput("row is missing stock".to_string()))?;
        Ok(ProductInput {
            name,
            category: self.take_non_empty("category"),
            brand: self.take_non_empty("brand"),
            stock: RawStock::Text(stock),
            unit: self.take_non_empty("unit"),
            image: self.take_non_empty("image"),
        })
    }

    fn take_non_empty(&mut self, key: &str) -> Option<String> {
        self.fields
            .remove(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImportRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_stock_is_trimmed_and_parsed() {
        assert_eq!(RawStock::from(" 12 ").coerce().expect("coerce"), 12);
        assert_eq!(RawStock::from("-3").coerce().expect("coerce"), -3);
    }

    #[test]
    fn non_integer_stock_is_invalid_input() {
        for raw in [
            RawStock::from("abc"),
            RawStock::from(""),
            RawStock::from("3.5"),
            RawStock::Number(2.5),
            RawStock::Number(f64::NAN),
        ] {
            assert!(matches!(raw.coerce(), Err(InventoryError::InvalidInput(_))), "{raw:?}");
        }
    }

    #[test]
    fn integral_number_is_accepted() {
        assert_eq!(RawStock::Number(5.0).coerce().expect("coerce"), 5);
    }

    #[test]
    fn stock_deserializes_from_number_or_text() {
        let a: ProductInput = serde_json::from_str(r#"{"name":"A","stock":4}"#).expect("json");
        let b: ProductInput = serde_json::from_str(r#"{"name":"B","stock":"4"}"#).expect("json");
        assert_eq!(a.stock, RawStock::Integer(4));
        assert_eq!(b.stock, RawStock::Text("4".to_string()));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = ProductInput::new("   ", 1).validate().expect_err("blank name");
        assert!(matches!(err, InventoryError::InvalidInput(_)));
    }

    #[test]
    fn attrs_derive_status_when_materialized() {
        let attrs = ProductInput::new("Widget", 0).validate().expect("valid");
        let product = attrs.into_product(7);
        assert_eq!(product.id, 7);
        assert_eq!(product.status, StockStatus::OutOfStock);
    }

    #[test]
    fn import_row_requires_name_and_stock() {
        let missing_stock = ImportRow::new().with("name", "A");
        let missing_name = ImportRow::new().with("stock", "1");
        assert!(matches!(missing_stock.into_input(), Err(InventoryError::InvalidInput(_))));
        assert!(matches!(missing_name.into_input(), Err(InventoryError::InvalidInput(_))));
    }

    #[test]
    fn import_row_blank_optionals_become_none() {
        let input = ImportRow::from_iter([("name", "A"), ("stock", "2"), ("brand", " "), ("unit", "kg")])
            .into_input()
            .expect("row");
        assert_eq!(input.brand, None);
        assert_eq!(input.unit.as_deref(), Some("kg"));
        assert_eq!(input.stock, RawStock::Text("2".to_string()));
    }
}
