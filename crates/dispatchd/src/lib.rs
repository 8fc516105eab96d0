//! Station dispatch daemon library - exposes modules for testing.

pub mod admin;
pub mod api_error;
pub mod config;
pub mod dispatcher;
pub mod incidents;
pub mod intake;
pub mod notifier;
pub mod provisioning;
pub mod referral;
pub mod routes;
pub mod server;
pub mod station_flags;
pub mod store;
pub mod triage;
pub mod turnout;
pub mod ws;

pub use dispatcher::Dispatcher;
pub use notifier::Notifier;
pub use store::{DispatchStore, MemoryStore, SharedStore, SqliteStore, StoreExt};
