//! Navigation lifecycle events delivered by a [`NavigationSource`](super::NavigationSource).
//!
//! Every event carries the target URL and [`NavigationMeta`]; errors also
//! carry a loosely shaped [`NavigationFailure`].

use std::fmt;

/// Navigation lifecycle event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationEventKind {
    Start,
    Complete,
    Error,
}

impl NavigationEventKind {
    /// Event name used when registering handlers
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationEventKind::Start => "navigation-start",
            NavigationEventKind::Complete => "navigation-complete",
            NavigationEventKind::Error => "navigation-error",
        }
    }

    pub fn all() -> &'static [NavigationEventKind] {
        &[
            NavigationEventKind::Start,
            NavigationEventKind::Complete,
            NavigationEventKind::Error,
        ]
    }
}

impl fmt::Display for NavigationEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata delivered with every navigation event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationMeta {
    /// Shallow navigations update the URL without re-fetching page data
    pub shallow: bool,
}

/// Failure payload of a `navigation-error` event.
///
/// Every field is optional; handlers must tolerate any shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationFailure {
    pub cancelled: Option<bool>,
    pub message: Option<String>,
}

impl NavigationFailure {
    pub fn cancelled() -> Self {
        Self {
            cancelled: Some(true),
            message: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            cancelled: None,
            message: Some(message.into()),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.unwrap_or(false)
    }
}

/// A navigation lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Start {
        url: String,
        meta: NavigationMeta,
    },
    Complete {
        url: String,
        meta: NavigationMeta,
    },
    Error {
        error: NavigationFailure,
        url: String,
        meta: NavigationMeta,
    },
}

impl NavigationEvent {
    pub fn start(url: impl Into<String>, shallow: bool) -> Self {
        NavigationEvent::Start {
            url: url.into(),
            meta: NavigationMeta { shallow },
        }
    }

    pub fn complete(url: impl Into<String>, shallow: bool) -> Self {
        NavigationEvent::Complete {
            url: url.into(),
            meta: NavigationMeta { shallow },
        }
    }

    pub fn error(error: NavigationFailure, url: impl Into<String>, shallow: bool) -> Self {
        NavigationEvent::Error {
            error,
            url: url.into(),
            meta: NavigationMeta { shallow },
        }
    }

    pub fn kind(&self) -> NavigationEventKind {
        match self {
            NavigationEvent::Start { .. } => NavigationEventKind::Start,
            NavigationEvent::Complete { .. } => NavigationEventKind::Complete,
            NavigationEvent::Error { .. } => NavigationEventKind::Error,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            NavigationEvent::Start { url, .. }
            | NavigationEvent::Complete { url, .. }
            | NavigationEvent::Error { url, .. } => url,
        }
    }

    pub fn meta(&self) -> NavigationMeta {
        match self {
            NavigationEvent::Start { meta, .. }
            | NavigationEvent::Complete { meta, .. }
            | NavigationEvent::Error { meta, .. } => *meta,
        }
    }
}
