//! Integration tests for store activation, navigation handling and teardown

use std::time::Duration;

use super::common::fixtures::StoreHarness;
use uichrome::capability::mock::MockProbe;
use uichrome::navigation::NavigationFailure;
use uichrome::{
    ContextMenu, MemorySlot, NavigationEvent, NavigationEventKind, StoreOptions, UiState,
};

/// A full session: activate, probe, mutate, navigate, tear down
#[tokio::test]
async fn test_session_lifecycle() {
    let harness = StoreHarness::activate(
        &MemorySlot::new(),
        MockProbe::resolving(true),
        StoreOptions::default(),
    );
    let store = &harness.store;
    let modifier = store.modifier();

    store.wait_for_probe().await;
    assert!(store.is_web_authn_supported());
    assert_eq!(harness.probe.calls(), 1);

    modifier.set_side_menu_visibility(true);
    modifier.set_context_menu(ContextMenu::new(true).with_kind("editor"));
    harness
        .bus
        .emit(&NavigationEvent::start("/projects/42", false));
    assert!(store.state().side_menu_visible());

    harness
        .bus
        .emit(&NavigationEvent::complete("/projects/42", false));
    let state = store.state();
    assert!(!state.side_menu_visible());
    assert!(state.web_authn_supported());
    assert_eq!(state.context_menu, Some(ContextMenu::new(true)));

    store.deactivate();
    for kind in NavigationEventKind::all() {
        assert_eq!(harness.bus.handler_count(*kind), 0);
    }
}

/// Navigation errors of any shape leave the state untouched
#[tokio::test]
async fn test_navigation_errors_never_change_state() {
    let harness = StoreHarness::activate(
        &MemorySlot::new(),
        MockProbe::resolving(false),
        StoreOptions::default(),
    );
    harness.store.modifier().set_side_menu_visibility(true);
    let before = harness.store.state();

    let failures = [
        NavigationFailure::default(),
        NavigationFailure::cancelled(),
        NavigationFailure {
            cancelled: Some(false),
            message: Some("Route aborted".into()),
        },
    ];
    for failure in failures {
        harness
            .bus
            .emit(&NavigationEvent::error(failure, "/login", true));
    }

    assert_eq!(harness.store.state(), before);
}

/// Two stores on the same bus each own their handlers
#[tokio::test]
async fn test_remount_does_not_leak_handlers() {
    let slot = MemorySlot::new();
    let first = StoreHarness::activate(&slot, MockProbe::resolving(false), StoreOptions::default());
    let bus = first.bus.clone();
    drop(first);
    assert_eq!(bus.handler_count(NavigationEventKind::Complete), 0);

    let store = uichrome::UiStateStore::activate(
        bus.clone(),
        std::sync::Arc::new(MockProbe::resolving(false)),
        &slot,
        StoreOptions::default(),
    );
    assert_eq!(bus.handler_count(NavigationEventKind::Complete), 1);

    store.modifier().set_side_menu_visibility(true);
    assert_eq!(bus.emit(&NavigationEvent::complete("/", false)), 1);
    assert!(!store.state().side_menu_visible());
}

/// Subscribers observe navigation-driven updates as they are published
#[tokio::test]
async fn test_subscriber_observes_navigation_update() {
    let harness = StoreHarness::activate(
        &MemorySlot::new(),
        MockProbe::resolving(false),
        StoreOptions::default(),
    );
    harness.store.modifier().set_side_menu_visibility(true);
    let mut updates = harness.store.subscribe();

    harness.bus.emit(&NavigationEvent::complete("/", true));

    let state = tokio::time::timeout(Duration::from_secs(1), updates.changed())
        .await
        .map(|_| updates.borrow_and_update().clone())
        .expect("update published");
    assert_eq!(
        *state,
        UiState {
            side_menu_visibility: Some(false),
            ..UiState::default()
        }
    );
}

/// A probe still pending at teardown never touches the state
#[tokio::test]
async fn test_probe_resolving_after_teardown() {
    let (probe, gate) = MockProbe::gated();
    let options = StoreOptions {
        probe_timeout: None,
        ..StoreOptions::default()
    };
    let harness = StoreHarness::activate(&MemorySlot::new(), probe, options);
    tokio::task::yield_now().await;

    harness.store.deactivate();
    harness.store.wait_for_probe().await;
    gate.resolve(Ok(true));

    assert_eq!(*harness.store.state(), UiState::default());
}
