//! Single-writer runtime loop and its event stream.

/// Broadcast payloads describing completed mutations.
pub mod events;
/// Command loop, handle, and runtime configuration.
pub mod handle;
