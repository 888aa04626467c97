pub mod capability;
pub mod config;
pub mod data;
pub mod navigation;
pub mod state;
pub mod util;

pub use capability::{CapabilityProbe, ProbeError, StaticProbe, ToolProbe};
pub use config::Config;
pub use data::{Database, MemorySlot, PersistedSlot, SqliteSlot};
pub use navigation::{NavigationBus, NavigationEvent, NavigationEventKind, NavigationSource};
pub use state::{
    ContextMenu, ContextMenuKind, MenuPosition, RestoreMode, StoreOptions,
    UiState, UiStateModifier, UiStateSetter, UiStateStore,
};
