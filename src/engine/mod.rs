//! Stock mutation, audit, and bulk import logic.

/// Sequential best-effort bulk import.
pub mod import;
/// Create, update-with-audit, and delete.
pub mod mutation;
/// Quantity to availability label.
pub mod status;
