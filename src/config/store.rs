use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;

use crate::error::ConfigError;

/// Key/value configuration store.
///
/// App values are strings scoped by application id; system values are string
/// lists. No transactional semantics: last write wins. Stores are shared
/// between request threads.
pub trait ConfigStore: Send + Sync {
    /// Returns the value of `key` for `app`, or `default` when unset.
    fn app_value(&self, app: &str, key: &str, default: &str) -> String;

    /// Stores `value` under `key` for `app`.
    fn set_app_value(&self, app: &str, key: &str, value: &str);

    /// Lists the keys set for `app`.
    fn app_keys(&self, app: &str) -> Vec<String>;

    /// Returns the system-wide list stored under `key`, empty when unset.
    fn system_values(&self, key: &str) -> Vec<String>;
}

/// On-disk layout of a configuration file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    /// `[apps.<app>]` tables of string values.
    #[serde(default)]
    apps: BTreeMap<String, BTreeMap<String, String>>,

    /// `[system]` table of string lists.
    #[serde(default)]
    system: BTreeMap<String, Vec<String>>,
}

/// Thread-safe in-memory configuration store.
///
/// # Examples
///
/// ```
/// use wopi_trust::{ConfigStore, MemoryConfig};
///
/// let config = MemoryConfig::from_toml_str(r#"
///     [apps.officeonline]
///     wopi_url = "https://office.example.com:9980"
///
///     [system]
///     "gs.trustedHosts" = ["a.example.com", "b.example.com"]
/// "#).unwrap();
///
/// assert_eq!(config.app_value("officeonline", "wopi_url", ""), "https://office.example.com:9980");
/// assert_eq!(config.system_values("gs.trustedHosts").len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryConfig {
    apps: RwLock<BTreeMap<String, BTreeMap<String, String>>>,
    system: RwLock<BTreeMap<String, Vec<String>>>,
}

impl MemoryConfig {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document into a store.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the document is not valid TOML or does
    /// not match the expected layout.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(Self {
            apps: RwLock::new(file.apps),
            system: RwLock::new(file.system),
        })
    }

    /// Replaces the system list stored under `key`.
    pub fn set_system_values(&self, key: &str, values: Vec<String>) {
        self.system
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), values);
    }
}

impl ConfigStore for MemoryConfig {
    fn app_value(&self, app: &str, key: &str, default: &str) -> String {
        self.apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(app)
            .and_then(|values| values.get(key))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set_app_value(&self, app: &str, key: &str, value: &str) {
        self.apps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(app.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    fn app_keys(&self, app: &str) -> Vec<String> {
        self.apps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(app)
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn system_values(&self, key: &str) -> Vec<String> {
        self.system
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .unwrap_or_default()
    }
}

/// Loads configuration from a TOML file, falling back to an empty store.
///
/// A missing file is not an error: trust sources simply see no configured
/// values.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<MemoryConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(MemoryConfig::new());
    };

    match std::fs::read_to_string(path) {
        Ok(contents) => MemoryConfig::from_toml_str(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "config file not found, using empty configuration");
            Ok(MemoryConfig::new())
        }
        Err(e) => Err(ConfigError::FileRead(e)),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn unset_app_value_returns_default() {
        let config = MemoryConfig::new();
        assert_eq!(config.app_value("officeonline", "doc_format", "ooxml"), "ooxml");
    }

    #[test]
    fn set_then_get_app_value() {
        let config = MemoryConfig::new();
        config.set_app_value("officeonline", "wopi_url", "https://office.example.com");

        assert_eq!(
            config.app_value("officeonline", "wopi_url", ""),
            "https://office.example.com"
        );
        assert_eq!(config.app_value("other", "wopi_url", ""), "");
    }

    #[test]
    fn app_keys_are_scoped_by_app() {
        let config = MemoryConfig::new();
        config.set_app_value("officeonline", "wopi_url", "x");
        config.set_app_value("officeonline", "doc_format", "odf");
        config.set_app_value("other", "key", "y");

        assert_eq!(config.app_keys("officeonline"), vec!["doc_format", "wopi_url"]);
        assert!(config.app_keys("missing").is_empty());
    }

    #[test]
    fn system_values_default_to_empty() {
        let config = MemoryConfig::new();
        assert!(config.system_values("gs.trustedHosts").is_empty());

        config.set_system_values("gs.trustedHosts", vec!["a.example.com".to_string()]);
        assert_eq!(config.system_values("gs.trustedHosts"), vec!["a.example.com"]);
    }

    #[test]
    fn from_toml_str_accepts_empty_document() {
        let config = MemoryConfig::from_toml_str("").unwrap();
        assert!(config.app_keys("officeonline").is_empty());
    }

    #[test]
    fn from_toml_str_rejects_wrong_types() {
        let result = MemoryConfig::from_toml_str("[system]\n\"gs.trustedHosts\" = \"a.example.com\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_config_without_path_is_empty() {
        let config = load_config(None).unwrap();
        assert!(config.app_keys("officeonline").is_empty());
    }

    #[test]
    fn load_config_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(dir.path().join("missing.toml").as_path())).unwrap();
        assert!(config.system_values("gs.trustedHosts").is_empty());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[apps.officeonline]").unwrap();
        writeln!(file, "public_wopi_url = \"https://public.example.com\"").unwrap();
        writeln!(file, "[system]").unwrap();
        writeln!(file, "\"gs.trustedHosts\" = [\"a.example.com\"]").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(
            config.app_value("officeonline", "public_wopi_url", ""),
            "https://public.example.com"
        );
        assert_eq!(config.system_values("gs.trustedHosts"), vec!["a.example.com"]);
    }

    #[test]
    fn load_config_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml = = =").unwrap();

        let result = load_config(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
