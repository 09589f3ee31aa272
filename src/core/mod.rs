//! In-memory store and index helpers.

/// Helper index aliases.
pub mod indices;
/// In-memory product and history store.
pub mod store;
