//! Local account store
//!
//! Accounts are keyed by their `@username@instance` address and persisted
//! as pretty-printed JSON:
//!
//! ```json
//! {
//!   "default": "@amy@example.social",
//!   "accounts": {
//!     "@amy@example.social": {
//!       "instance": "example.social",
//!       "client_id": "...",
//!       "client_secret": "...",
//!       "access_token": "..."
//!     }
//!   }
//! }
//! ```
//!
//! The store is read once and written once per invocation; there is no file
//! locking, and overlapping invocations against the same file are not
//! supported.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Credentials for one account on one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub instance: String,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
}

/// The persisted account file: a default address plus the account map.
///
/// `BTreeMap` keeps listings and serialized output in a stable order.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AccountStore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub accounts: BTreeMap<String, Account>,

    #[serde(skip)]
    path: PathBuf,
}

impl AccountStore {
    /// Load the store from its resolved location.
    ///
    /// A missing file is not an error; it loads as an empty store that will
    /// create the file (and its parent directories) on first save.
    pub fn load() -> Result<Self> {
        Self::load_from_path(resolve_store_path()?)
    }

    /// Load the store from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                ..Self::default()
            });
        }
        let content = std::fs::read_to_string(&path).map_err(ConfigError::ReadError)?;
        let mut store: AccountStore =
            serde_json::from_str(&content).map_err(ConfigError::ParseError)?;
        store.path = path;
        Ok(store)
    }

    /// Persist the store, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::ParseError)?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::WriteError {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Addresses in stable (sorted) order.
    pub fn addresses(&self) -> impl Iterator<Item = &String> {
        self.accounts.keys()
    }

    pub fn is_default(&self, address: &str) -> bool {
        self.default.as_deref() == Some(address)
    }

    /// Register an account under its address and make it the default.
    /// An existing entry under the same address is replaced.
    pub fn add(&mut self, address: String, account: Account) {
        self.default = Some(address.clone());
        self.accounts.insert(address, account);
    }

    /// Remove an account. When the default is removed, the first remaining
    /// account becomes the default; removing the last account clears it.
    pub fn remove(&mut self, address: &str) -> Result<()> {
        if self.accounts.remove(address).is_none() {
            return Err(ConfigError::UnknownAccount(address.to_string()).into());
        }
        if self.default.as_deref() == Some(address) {
            self.default = self.accounts.keys().next().cloned();
        }
        Ok(())
    }

    /// Make an existing account the default.
    pub fn set_default(&mut self, address: &str) -> Result<()> {
        if !self.accounts.contains_key(address) {
            return Err(ConfigError::UnknownAccount(address.to_string()).into());
        }
        self.default = Some(address.to_string());
        Ok(())
    }

    /// Resolve the account to post with: an explicit address when given,
    /// the default otherwise.
    pub fn resolve<'a>(&'a self, address: Option<&'a str>) -> Result<(&'a str, &'a Account)> {
        if self.accounts.is_empty() {
            return Err(ConfigError::NoAccounts.into());
        }
        let address = match address {
            Some(addr) => addr,
            None => self.default.as_deref().ok_or(ConfigError::NoAccounts)?,
        };
        let account = self
            .accounts
            .get(address)
            .ok_or_else(|| ConfigError::UnknownAccount(address.to_string()))?;
        Ok((address, account))
    }
}

/// Split an `@username@instance` address into `(username, instance)`.
///
/// The username may contain alphanumerics, `_`, `-` and `.`; the instance
/// must look like a hostname with at least one dot.
pub fn parse_address(address: &str) -> Result<(String, String)> {
    let trimmed = address.trim();
    let mut parts = trimmed.split('@').filter(|part| !part.is_empty());
    let (username, instance) = match (parts.next(), parts.next(), parts.next()) {
        (Some(user), Some(host), None) if trimmed.starts_with('@') => (user, host),
        _ => return Err(ConfigError::InvalidAddress(address.to_string()).into()),
    };

    let valid_user = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let valid_instance = instance.contains('.')
        && !instance.starts_with('.')
        && !instance.ends_with('.')
        && instance
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '-' | '.'));

    if !valid_user || !valid_instance {
        return Err(ConfigError::InvalidAddress(address.to_string()).into());
    }
    Ok((username.to_string(), instance.to_string()))
}

/// Resolve the account store path.
///
/// `TOOTCAST_CONFIG` overrides the default of
/// `<config dir>/tootcast/accounts.json`.
pub fn resolve_store_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("TOOTCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingPath("config directory".to_string()))?;

    Ok(config_dir.join("tootcast").join("accounts.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TootcastError;
    use tempfile::TempDir;

    fn account(instance: &str) -> Account {
        Account {
            instance: instance.to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            access_token: "access-token".to_string(),
        }
    }

    #[test]
    fn test_missing_file_loads_as_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = AccountStore::load_from_path(dir.path().join("accounts.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.default, None);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("accounts.json");

        let mut store = AccountStore::load_from_path(path.clone()).unwrap();
        store.add("@amy@example.social".to_string(), account("example.social"));
        store.save().unwrap();

        let reloaded = AccountStore::load_from_path(path).unwrap();
        assert_eq!(reloaded.default.as_deref(), Some("@amy@example.social"));
        assert_eq!(
            reloaded.accounts.get("@amy@example.social"),
            Some(&account("example.social"))
        );
    }

    #[test]
    fn test_serialized_schema_keys() {
        let mut store = AccountStore::default();
        store.add("@amy@example.social".to_string(), account("example.social"));

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&store).unwrap()).unwrap();
        assert_eq!(json["default"], "@amy@example.social");
        assert_eq!(
            json["accounts"]["@amy@example.social"]["instance"],
            "example.social"
        );
        assert!(json["accounts"]["@amy@example.social"]["client_id"].is_string());
        assert!(json["accounts"]["@amy@example.social"]["client_secret"].is_string());
        assert!(json["accounts"]["@amy@example.social"]["access_token"].is_string());
    }

    #[test]
    fn test_add_makes_the_account_default() {
        let mut store = AccountStore::default();
        store.add("@amy@example.social".to_string(), account("example.social"));
        store.add("@ben@other.social".to_string(), account("other.social"));
        assert!(store.is_default("@ben@other.social"));
    }

    #[test]
    fn test_remove_unknown_account_is_an_error() {
        let mut store = AccountStore::default();
        let result = store.remove("@nobody@example.social");
        assert!(matches!(
            result,
            Err(TootcastError::Config(ConfigError::UnknownAccount(_)))
        ));
    }

    #[test]
    fn test_removing_the_default_promotes_first_remaining() {
        let mut store = AccountStore::default();
        store.add("@ben@example.social".to_string(), account("example.social"));
        store.add("@amy@example.social".to_string(), account("example.social"));
        assert!(store.is_default("@amy@example.social"));

        store.remove("@amy@example.social").unwrap();
        assert!(store.is_default("@ben@example.social"));

        store.remove("@ben@example.social").unwrap();
        assert_eq!(store.default, None);
    }

    #[test]
    fn test_set_default_requires_an_existing_account() {
        let mut store = AccountStore::default();
        store.add("@amy@example.social".to_string(), account("example.social"));

        assert!(store.set_default("@nobody@example.social").is_err());
        store.set_default("@amy@example.social").unwrap();
        assert!(store.is_default("@amy@example.social"));
    }

    #[test]
    fn test_resolve_empty_store_is_an_error() {
        let store = AccountStore::default();
        assert!(matches!(
            store.resolve(None),
            Err(TootcastError::Config(ConfigError::NoAccounts))
        ));
    }

    #[test]
    fn test_resolve_uses_the_default() {
        let mut store = AccountStore::default();
        store.add("@amy@example.social".to_string(), account("example.social"));
        store.add("@ben@other.social".to_string(), account("other.social"));
        store.set_default("@amy@example.social").unwrap();

        let (address, resolved) = store.resolve(None).unwrap();
        assert_eq!(address, "@amy@example.social");
        assert_eq!(resolved.instance, "example.social");
    }

    #[test]
    fn test_resolve_explicit_address_overrides_default() {
        let mut store = AccountStore::default();
        store.add("@amy@example.social".to_string(), account("example.social"));
        store.add("@ben@other.social".to_string(), account("other.social"));
        store.set_default("@amy@example.social").unwrap();

        let (address, resolved) = store.resolve(Some("@ben@other.social")).unwrap();
        assert_eq!(address, "@ben@other.social");
        assert_eq!(resolved.instance, "other.social");
    }

    #[test]
    fn test_resolve_unknown_explicit_address_is_an_error() {
        let mut store = AccountStore::default();
        store.add("@amy@example.social".to_string(), account("example.social"));

        assert!(matches!(
            store.resolve(Some("@nobody@example.social")),
            Err(TootcastError::Config(ConfigError::UnknownAccount(_)))
        ));
    }

    #[test]
    fn test_parse_address_accepts_well_formed_addresses() {
        assert_eq!(
            parse_address("@amy@example.social").unwrap(),
            ("amy".to_string(), "example.social".to_string())
        );
        assert_eq!(
            parse_address("  @a_b-c.d@sub.example.ca  ").unwrap(),
            ("a_b-c.d".to_string(), "sub.example.ca".to_string())
        );
    }

    #[test]
    fn test_parse_address_rejects_malformed_addresses() {
        for bad in [
            "",
            "amy",
            "amy@example.social",
            "@amy",
            "@amy@",
            "@amy@noinstance",
            "@amy@.social",
            "@amy@example.social@extra",
            "@am y@example.social",
        ] {
            assert!(parse_address(bad).is_err(), "accepted: {:?}", bad);
        }
    }
}
