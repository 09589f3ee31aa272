//! Single-writer runtime handle and events.

/// Event payloads broadcast to subscribers.
pub mod events;
/// Async handle, command loop, and access gating.
pub mod handle;
