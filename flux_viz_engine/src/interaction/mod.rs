//! Hover/click/brush/keyboard finite state machine that sits above any
//! concrete render surface and survives tier transitions.

mod selection;
mod coordinator;

pub use selection::{InteractionEvent, SelectionState};
pub use coordinator::{InteractionConfig, InteractionCoordinator};
