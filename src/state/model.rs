//! The UI chrome state record and its parts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a context menu is attached to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContextMenuKind {
    #[default]
    Editor,
    /// Caller-defined menu type
    Custom(String),
}

impl ContextMenuKind {
    pub fn as_str(&self) -> &str {
        match self {
            ContextMenuKind::Editor => "editor",
            ContextMenuKind::Custom(name) => name,
        }
    }
}

impl From<String> for ContextMenuKind {
    fn from(value: String) -> Self {
        if value == "editor" {
            ContextMenuKind::Editor
        } else {
            ContextMenuKind::Custom(value)
        }
    }
}

impl From<&str> for ContextMenuKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ContextMenuKind> for String {
    fn from(kind: ContextMenuKind) -> Self {
        match kind {
            ContextMenuKind::Editor => "editor".to_string(),
            ContextMenuKind::Custom(name) => name,
        }
    }
}

/// Screen position of a context menu. Not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MenuPosition {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl MenuPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Context menu sub-record. Always replaced as a whole.
///
/// Each field falls back to its default when a snapshot omits it, so
/// `{"show":true}` restores as a visible `editor` menu at the origin even
/// in [`RestoreMode::Replace`](super::RestoreMode::Replace).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextMenu {
    #[serde(default)]
    pub show: bool,
    #[serde(rename = "type", default)]
    pub kind: ContextMenuKind,
    #[serde(default)]
    pub position: MenuPosition,
}

impl ContextMenu {
    /// A menu of kind `editor` at the origin
    pub fn new(show: bool) -> Self {
        Self {
            show,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<ContextMenuKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_position(mut self, position: MenuPosition) -> Self {
        self.position = position;
        self
    }
}

/// Transient UI chrome state.
///
/// Every field is optional: a snapshot restored from the persisted slot
/// replaces the whole record, so fields it omits are genuinely absent.
/// [`UiState::default`] is the record a fresh store starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Opaque settings passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_visibility: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_visibility: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_menu_visibility: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_authn_support: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_menu: Option<ContextMenu>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_screen_menu_open: Option<bool>,
    /// Top-level keys this build does not know, written back as read
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            setting: Some(Map::new()),
            header_visibility: Some(true),
            footer_visibility: Some(true),
            side_menu_visibility: Some(false),
            web_authn_support: Some(false),
            context_menu: Some(ContextMenu::default()),
            full_screen_menu_open: None,
            extra: Map::new(),
        }
    }
}

impl UiState {
    /// A record with every field absent
    pub fn empty() -> Self {
        Self {
            setting: None,
            header_visibility: None,
            footer_visibility: None,
            side_menu_visibility: None,
            web_authn_support: None,
            context_menu: None,
            full_screen_menu_open: None,
            extra: Map::new(),
        }
    }

    /// Fill every field absent from `self` with the value from `base`
    pub fn merged_over(self, base: &UiState) -> UiState {
        let mut extra = base.extra.clone();
        extra.extend(self.extra);
        UiState {
            setting: self.setting.or_else(|| base.setting.clone()),
            header_visibility: self.header_visibility.or(base.header_visibility),
            footer_visibility: self.footer_visibility.or(base.footer_visibility),
            side_menu_visibility: self.side_menu_visibility.or(base.side_menu_visibility),
            web_authn_support: self.web_authn_support.or(base.web_authn_support),
            context_menu: self.context_menu.or_else(|| base.context_menu.clone()),
            full_screen_menu_open: self.full_screen_menu_open.or(base.full_screen_menu_open),
            extra,
        }
    }

    pub fn header_visible(&self) -> bool {
        self.header_visibility.unwrap_or(false)
    }

    pub fn footer_visible(&self) -> bool {
        self.footer_visibility.unwrap_or(false)
    }

    pub fn side_menu_visible(&self) -> bool {
        self.side_menu_visibility.unwrap_or(false)
    }

    pub fn web_authn_supported(&self) -> bool {
        self.web_authn_support.unwrap_or(false)
    }

    pub fn full_screen_menu_opened(&self) -> bool {
        self.full_screen_menu_open.unwrap_or(false)
    }
}
