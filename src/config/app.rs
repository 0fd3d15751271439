use std::collections::BTreeMap;

use serde::Serialize;

use super::ConfigStore;
use crate::APP_ID;

/// System key holding the global-scale trusted host list.
pub const SYSTEM_GS_TRUSTED_HOSTS: &str = "gs.trustedHosts";

/// App key enabling federation peers to use the trusted domain list.
pub const FEDERATION_USE_TRUSTED_DOMAINS: &str = "federation_use_trusted_domains";

const PUBLIC_WOPI_URL: &str = "public_wopi_url";
const WOPI_URL: &str = "wopi_url";

const DEFAULTS: &[(&str, &str)] = &[(WOPI_URL, ""), ("doc_format", "ooxml")];

/// Settings stored as comma-separated lists.
const LIST_SETTINGS: &[&str] = &["external_apps"];

/// A setting value as presented to the admin settings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// `"yes"` / `"no"` flags
    Bool(bool),
    /// Comma-separated list settings
    List(Vec<String>),
    /// Everything else, verbatim
    Text(String),
}

/// Typed view over a [`ConfigStore`] for the office integration.
///
/// # Examples
///
/// ```
/// use wopi_trust::{AppConfig, MemoryConfig};
///
/// let store = MemoryConfig::new();
/// let config = AppConfig::new(&store);
///
/// assert_eq!(config.app_value("doc_format"), "ooxml");
///
/// config.set_app_value("wopi_url", "http://office.internal:9980");
/// assert_eq!(config.public_url(), "http://office.internal:9980");
///
/// config.set_app_value("public_wopi_url", "https://office.example.com");
/// assert_eq!(config.public_url(), "https://office.example.com");
/// ```
#[derive(Clone, Copy)]
pub struct AppConfig<'a> {
    store: &'a dyn ConfigStore,
}

impl<'a> AppConfig<'a> {
    /// Wraps a configuration store.
    pub fn new(store: &'a dyn ConfigStore) -> Self {
        Self { store }
    }

    /// Returns `key`, falling back to the built-in default (or `""`).
    pub fn app_value(&self, key: &str) -> String {
        let default = DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
            .unwrap_or("");
        self.store.app_value(APP_ID, key, default)
    }

    /// Returns a list setting; an empty value is an empty list.
    pub fn app_value_list(&self, key: &str) -> Vec<String> {
        self.app_value(key)
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Stores `value` under `key`.
    pub fn set_app_value(&self, key: &str, value: &str) {
        self.store.set_app_value(APP_ID, key, value);
    }

    /// Returns every stored setting, typed for display.
    ///
    /// `"yes"` and `"no"` become booleans, list settings are split.
    pub fn app_settings(&self) -> BTreeMap<String, SettingValue> {
        self.store
            .app_keys(APP_ID)
            .into_iter()
            .map(|key| {
                let value = if LIST_SETTINGS.contains(&key.as_str()) {
                    SettingValue::List(self.app_value_list(&key))
                } else {
                    match self.app_value(&key).as_str() {
                        "yes" => SettingValue::Bool(true),
                        "no" => SettingValue::Bool(false),
                        other => SettingValue::Text(other.to_string()),
                    }
                };
                (key, value)
            })
            .collect()
    }

    /// Returns the internal base URL of the office server.
    pub fn internal_url(&self) -> String {
        self.app_value(WOPI_URL)
    }

    /// Returns the URL browsers use to reach the office server.
    ///
    /// The public override wins when it is set and non-blank; otherwise the
    /// internal URL is used. Never fails: no configuration yields `""`.
    pub fn public_url(&self) -> String {
        let public = self.store.app_value(APP_ID, PUBLIC_WOPI_URL, "");
        if public.trim().is_empty() {
            self.internal_url()
        } else {
            public
        }
    }

    /// Returns the configured global-scale trusted hosts.
    pub fn global_scale_trusted_hosts(&self) -> Vec<String> {
        self.store.system_values(SYSTEM_GS_TRUSTED_HOSTS)
    }

    /// Returns `true` if federation peers may use the trusted domain list.
    pub fn federation_use_trusted_domains(&self) -> bool {
        self.store
            .app_value(APP_ID, FEDERATION_USE_TRUSTED_DOMAINS, "no")
            == "yes"
    }
}
