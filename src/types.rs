//! Shared primitive IDs and inventory enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned product identifier.
pub type ProductId = i64;
/// Store-assigned history entry identifier.
pub type HistoryId = i64;
/// Stock quantity. Zero and negative values are legal.
pub type Quantity = i64;

/// Availability label derived from a product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    /// Stock is strictly positive.
    #[serde(rename = "In Stock")]
    InStock,
    /// Stock is zero or negative.
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// Label persisted in storage and shown to users.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }

    /// Parses a persisted label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "In Stock" => Some(Self::InStock),
            "Out of Stock" => Some(Self::OutOfStock),
            _ => None,
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of stock transition recorded in history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    /// Quantity changed through a product update.
    Update,
}

impl ActionType {
    /// Label persisted in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Update => "Update",
        }
    }

    /// Parses a persisted label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Update" => Some(Self::Update),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
