//! Navigation lifecycle events consumed by the UI state store

mod bus;
mod events;

pub use bus::{HandlerId, NavigationBus, NavigationHandler, NavigationSource};
pub use events::{NavigationEvent, NavigationEventKind, NavigationFailure, NavigationMeta};
