use std::sync::Arc;

use tempfile::TempDir;
use uichrome::capability::mock::MockProbe;
use uichrome::{Database, NavigationBus, PersistedSlot, SqliteSlot, StoreOptions, UiStateStore};

/// A store plus the collaborators tests need to drive it
pub struct StoreHarness {
    pub bus: Arc<NavigationBus>,
    pub probe: MockProbe,
    pub store: UiStateStore,
}

impl StoreHarness {
    pub fn activate(slot: &dyn PersistedSlot, probe: MockProbe, options: StoreOptions) -> Self {
        let bus = Arc::new(NavigationBus::new());
        let store = UiStateStore::activate(bus.clone(), Arc::new(probe.clone()), slot, options);
        Self { bus, probe, store }
    }
}

/// A SQLite-backed slot in a temporary directory
pub struct DiskSlot {
    pub dir: TempDir,
    pub database: Database,
    pub slot: SqliteSlot,
}

impl DiskSlot {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let database =
            Database::open(dir.path().join("uichrome.db")).expect("Failed to open database");
        let slot = SqliteSlot::new(database.connection());
        Self {
            dir,
            database,
            slot,
        }
    }

    /// Reopen the same database file, as a later session would
    pub fn reopen(&self) -> SqliteSlot {
        let database = Database::open(self.database.path.clone()).expect("Failed to reopen database");
        SqliteSlot::new(database.connection())
    }
}
