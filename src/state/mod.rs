//! Transient UI chrome state and the store that owns it

mod change;
mod model;
mod store;

pub use change::UiStateChange;
pub use model::{ContextMenu, ContextMenuKind, MenuPosition, UiState};
pub use store::{
    PersistError, RestoreMode, StoreOptions, UiStateModifier, UiStateSetter,
    UiStateStore, DEFAULT_STORAGE_KEY,
};
