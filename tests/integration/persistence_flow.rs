//! Integration tests for restoring and persisting snapshots through SQLite

use super::common::fixtures::{DiskSlot, StoreHarness};
use uichrome::capability::mock::MockProbe;
use uichrome::state::DEFAULT_STORAGE_KEY;
use uichrome::{PersistedSlot, RestoreMode, StoreOptions, UiState};

/// State persisted in one session is restored verbatim in the next
#[tokio::test]
async fn test_state_survives_sessions() {
    let disk = DiskSlot::new();
    {
        let harness =
            StoreHarness::activate(&disk.slot, MockProbe::resolving(false), StoreOptions::default());
        let modifier = harness.store.modifier();
        modifier.set_header_footer_visibility(false, true);
        modifier.set_full_screen_menu_open(true);
        harness.store.persist(&disk.slot).unwrap();
    }

    let slot = disk.reopen();
    let harness = StoreHarness::activate(&slot, MockProbe::resolving(false), StoreOptions::default());
    assert_eq!(
        *harness.store.state(),
        UiState {
            header_visibility: Some(false),
            footer_visibility: Some(true),
            full_screen_menu_open: Some(true),
            ..UiState::default()
        }
    );
}

/// A partial snapshot replaces the record; missing fields stay absent
#[tokio::test]
async fn test_partial_snapshot_is_not_merged() {
    let disk = DiskSlot::new();
    disk.slot
        .set(DEFAULT_STORAGE_KEY, r#"{"headerVisibility":false}"#)
        .unwrap();

    let harness =
        StoreHarness::activate(&disk.slot, MockProbe::resolving(false), StoreOptions::default());
    let state = harness.store.state();

    assert_eq!(
        serde_json::to_value(state.as_ref()).unwrap(),
        serde_json::json!({ "headerVisibility": false })
    );
}

/// With merge restore the same snapshot keeps every other default
#[tokio::test]
async fn test_partial_snapshot_merged_when_configured() {
    let disk = DiskSlot::new();
    disk.slot
        .set(DEFAULT_STORAGE_KEY, r#"{"headerVisibility":false}"#)
        .unwrap();
    let options = StoreOptions {
        restore_mode: RestoreMode::MergeOverDefaults,
        ..StoreOptions::default()
    };

    let harness = StoreHarness::activate(&disk.slot, MockProbe::resolving(false), options);

    assert!(!harness.store.state().header_visible());
    assert!(harness.store.state().footer_visible());
    assert_eq!(harness.store.state().context_menu, UiState::default().context_menu);
}

/// A corrupt snapshot is ignored and the defaults stay in place
#[tokio::test]
async fn test_corrupt_snapshot_fails_open() {
    let disk = DiskSlot::new();
    disk.slot.set(DEFAULT_STORAGE_KEY, "{\"headerVisibility\":").unwrap();

    let harness =
        StoreHarness::activate(&disk.slot, MockProbe::resolving(true), StoreOptions::default());
    assert_eq!(*harness.store.state(), UiState::default());

    harness.store.wait_for_probe().await;
    assert!(harness.store.is_web_authn_supported());
}

/// The snapshot is applied at activation; detection lands on top of it
#[tokio::test]
async fn test_detection_lands_on_restored_snapshot() {
    let disk = DiskSlot::new();
    disk.slot
        .set(
            DEFAULT_STORAGE_KEY,
            r#"{"sideMenuVisibility":true,"webAuthnSupport":false}"#,
        )
        .unwrap();

    let harness =
        StoreHarness::activate(&disk.slot, MockProbe::resolving(true), StoreOptions::default());
    harness.store.wait_for_probe().await;

    let state = harness.store.state();
    assert_eq!(state.web_authn_support, Some(true));
    assert!(state.side_menu_visible());
    assert_eq!(state.header_visibility, None);
}

/// Keys this build does not model survive a restore and persist cycle on disk
#[tokio::test]
async fn test_unknown_keys_survive_sessions() {
    let disk = DiskSlot::new();
    disk.slot
        .set(DEFAULT_STORAGE_KEY, r#"{"headerVisibility":false,"theme":"dark"}"#)
        .unwrap();
    {
        let harness =
            StoreHarness::activate(&disk.slot, MockProbe::resolving(false), StoreOptions::default());
        harness.store.modifier().set_side_menu_visibility(true);
        harness.store.persist(&disk.slot).unwrap();
    }

    let slot = disk.reopen();
    let raw = slot.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&raw).unwrap(),
        serde_json::json!({
            "headerVisibility": false,
            "sideMenuVisibility": true,
            "theme": "dark"
        })
    );
}
