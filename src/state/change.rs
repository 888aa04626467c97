//! Named whole-record updates applied by the store

use super::model::{ContextMenu, UiState};

/// A targeted change to the UI state record.
///
/// Applying a change produces a new record in which only the targeted
/// fields differ from the previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum UiStateChange {
    FullScreenMenuOpen(bool),
    HeaderFooterVisibility { header: bool, footer: bool },
    SideMenuVisibility(bool),
    /// Replaces the whole context menu sub-record
    ContextMenu(ContextMenu),
    /// The capability probe reported platform authenticator support
    CapabilityDetected,
}

impl UiStateChange {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            UiStateChange::FullScreenMenuOpen(_) => "full-screen-menu",
            UiStateChange::HeaderFooterVisibility { .. } => "header-footer",
            UiStateChange::SideMenuVisibility(_) => "side-menu",
            UiStateChange::ContextMenu(_) => "context-menu",
            UiStateChange::CapabilityDetected => "capability-detected",
        }
    }

    pub fn apply(&self, prev: &UiState) -> UiState {
        let mut next = prev.clone();
        match self {
            UiStateChange::FullScreenMenuOpen(open) => next.full_screen_menu_open = Some(*open),
            UiStateChange::HeaderFooterVisibility { header, footer } => {
                next.header_visibility = Some(*header);
                next.footer_visibility = Some(*footer);
            }
            UiStateChange::SideMenuVisibility(visible) => {
                next.side_menu_visibility = Some(*visible)
            }
            UiStateChange::ContextMenu(menu) => next.context_menu = Some(menu.clone()),
            UiStateChange::CapabilityDetected => next.web_authn_support = Some(true),
        }
        next
    }
}
