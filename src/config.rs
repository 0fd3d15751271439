//! Configuration access.
//!
//! This module provides:
//! - `ConfigStore`: the key/value store collaborator (app values and system lists)
//! - `MemoryConfig`: a thread-safe in-memory store, loadable from TOML
//! - `AppConfig`: typed accessors for the office integration's settings
//!
//! Missing values are never errors: they fall back to defaults or to empty
//! strings, which the trust sources filter out.

mod app;
mod store;

pub use app::{AppConfig, SettingValue, FEDERATION_USE_TRUSTED_DOMAINS, SYSTEM_GS_TRUSTED_HOSTS};
pub use store::{load_config, ConfigStore, MemoryConfig};
