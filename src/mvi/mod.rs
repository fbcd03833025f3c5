//! Model-View-Intent (MVI) primitives.
//!
//! Table state changes flow in one direction:
//!
//! ```text
//! Action ──→ Intent ──→ Reducer ──→ State ──→ Snapshot
//!    ↑                                            │
//!    └────────────────────────────────────────────┘
//! ```
//!
//! - **State**: plain data a view renders from
//! - **Intent**: a state change requested by an action or an API response
//! - **Reducer**: pure function producing the next state

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
