//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (open the edit modal, change the keyword)
/// - Request lifecycle events (query started, result received)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
