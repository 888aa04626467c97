//! Command line interface: one store session per invocation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use uichrome::capability::CapabilityProbe;
use uichrome::data::PersistedSlot;
use uichrome::navigation::{NavigationBus, NavigationEvent, NavigationFailure};
use uichrome::state::{ContextMenu, MenuPosition, UiState, UiStateStore};
use uichrome::Config;

#[derive(Parser, Debug)]
#[command(
    name = "uichrome",
    version,
    about = "Inspect and update persisted UI chrome state"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Data directory (default: ~/.uichrome).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the current state.
    Show,

    /// Set header and footer visibility.
    HeaderFooter {
        #[arg(value_name = "HEADER", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        header: bool,
        #[arg(value_name = "FOOTER", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        footer: bool,
    },

    /// Show or hide the side menu.
    SideMenu {
        #[arg(value_name = "VISIBLE", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        visible: bool,
    },

    /// Open or close the full screen menu.
    FullScreenMenu {
        #[arg(value_name = "OPEN", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        open: bool,
    },

    /// Replace the context menu.
    ContextMenu(ContextMenuArgs),

    /// Simulate a navigation.
    Navigate(NavigateArgs),

    /// Remove the persisted state.
    Reset,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ContextMenuArgs {
    /// Hide the menu instead of showing it.
    #[arg(long)]
    pub hide: bool,

    /// Menu type (default: editor).
    #[arg(long, value_name = "TYPE")]
    pub kind: Option<String>,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub y: f64,
}

impl ContextMenuArgs {
    fn menu(&self) -> ContextMenu {
        let menu = ContextMenu::new(!self.hide).with_position(MenuPosition::new(self.x, self.y));
        match &self.kind {
            Some(kind) => menu.with_kind(kind.as_str()),
            None => menu,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct NavigateArgs {
    #[arg(value_name = "URL")]
    pub url: String,

    /// Shallow navigation (URL change only).
    #[arg(long)]
    pub shallow: bool,

    /// End the navigation with an error instead of completing it.
    #[arg(long)]
    pub fail: bool,

    /// Mark the failure as a cancellation.
    #[arg(long, requires = "fail")]
    pub cancelled: bool,
}

impl NavigateArgs {
    fn events(&self) -> [NavigationEvent; 2] {
        let finish = if self.fail {
            let failure = if self.cancelled {
                NavigationFailure::cancelled()
            } else {
                NavigationFailure::default()
            };
            NavigationEvent::error(failure, &self.url, self.shallow)
        } else {
            NavigationEvent::complete(&self.url, self.shallow)
        };
        [NavigationEvent::start(&self.url, self.shallow), finish]
    }
}

/// Activate a store against `slot`, apply `command` and return the resulting state.
///
/// Mutating commands persist the new state; `reset` removes the slot entry first.
pub async fn run(
    command: &Command,
    config: &Config,
    slot: &dyn PersistedSlot,
    probe: Arc<dyn CapabilityProbe>,
) -> Result<Arc<UiState>> {
    if *command == Command::Reset {
        slot.remove(&config.storage_key)?;
        tracing::info!(key = %config.storage_key, "Removed persisted UI state");
    }

    let bus = Arc::new(NavigationBus::new());
    let store = UiStateStore::activate(bus.clone(), probe, slot, config.store_options());
    store.wait_for_probe().await;

    let modifier = store.modifier();
    let persist = match command {
        Command::Show | Command::Reset => false,
        Command::HeaderFooter { header, footer } => {
            modifier.set_header_footer_visibility(*header, *footer);
            true
        }
        Command::SideMenu { visible } => {
            modifier.set_side_menu_visibility(*visible);
            true
        }
        Command::FullScreenMenu { open } => {
            modifier.set_full_screen_menu_open(*open);
            true
        }
        Command::ContextMenu(args) => {
            modifier.set_context_menu(args.menu());
            true
        }
        Command::Navigate(args) => {
            for event in args.events() {
                bus.emit(&event);
            }
            true
        }
    };

    if persist {
        store.persist(slot)?;
    }

    let state = store.state();
    store.deactivate();
    Ok(state)
}
