//! Base trait for view state.

/// Marker trait for state objects.
///
/// States are cloned into snapshots for readers and compared to detect
/// changes, so they must stay self-contained.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
