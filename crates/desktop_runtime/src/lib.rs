//! Desktop window-manager runtime: state model, reducer, store, persistence and config.

pub mod apps;
pub mod config;
pub mod model;
pub mod persistence;
pub mod reducer;
pub mod store;
pub mod window_manager;

pub use config::{ConfigError, DesktopConfig, TerminalConfig};
pub use model::*;
pub use persistence::{
    load_boot_snapshot, load_desktop_snapshot, persist_desktop_snapshot, PersistenceError,
};
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use store::{DesktopStore, StoreEvent, SubscriptionId};
