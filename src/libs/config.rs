//! Application configuration.
//!
//! Stored as pretty-printed JSON in `config.json` inside the data directory.
//! Every module is optional so a fresh install runs with defaults until
//! `ihsan init` has been run.
//!
//! ## Modules
//!
//! - **Server**: base URL of the ihsan API, the account email and the
//!   request timeout
//! - **Storage**: the snapshot slot the store persists into, which lets
//!   several profiles share one database
//!
//! ## Storage and Security
//!
//! - Passwords are never written to the configuration file
//! - The session token lives in a separate encrypted file (see
//!   [`crate::libs::secret`])
//! - `IHSAN_API_URL` overrides the configured server URL at runtime
//!
//! ```json
//! {
//!   "server": { "api_url": "https://ihsan.example.com/api", "email": "me@example.com", "timeout_secs": 30 },
//!   "storage": { "slot": "life-dashboard-storage" }
//! }
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};
use std::path::Path;

/// Configuration file name inside the application data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";
/// Environment variable that replaces the configured server URL.
pub const API_URL_ENV: &str = "IHSAN_API_URL";
/// Snapshot slot used when no storage module is configured.
pub const DEFAULT_SLOT: &str = "life-dashboard-storage";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A configurable module offered by the setup wizard.
///
/// The `key` routes the selection to the module's own `init`, the `name` is
/// what the user sees in the selection list.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Identifier used to dispatch the selection
    pub key: String,
    /// Display name in the wizard
    pub name: String,
}

/// Connection settings for the ihsan server.
///
/// Only the email is stored; the password is asked for on login and the
/// resulting token goes to encrypted storage.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the API, e.g. `https://ihsan.example.com/api`.
    ///
    /// Record routes such as `/tasks` and `/events/month` are appended to it.
    pub api_url: String,

    /// Account email used for login and registration.
    pub email: String,

    /// Request timeout in seconds applied to every HTTP call.
    ///
    /// Missing in files written before the option existed, in which case
    /// [`DEFAULT_TIMEOUT_SECS`] applies.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Cached from the last login, used for the dashboard greeting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            api_url: "http://localhost:3000/api".to_string(),
            email: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            first_name: None,
        }
    }
}

impl ServerConfig {
    /// Wizard entry for the server module.
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "server".to_string(),
            name: "Server".to_string(),
        }
    }

    /// Prompts for the server settings.
    ///
    /// # Arguments
    ///
    /// * `config` - Current settings, offered as prompt defaults when present
    ///
    /// # Returns
    ///
    /// The new settings, or an error if a prompt could not be read. The cached
    /// first name is carried over unchanged.
    pub fn init(config: &Option<ServerConfig>) -> Result<Self> {
        let default = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleServer);
        Ok(ServerConfig {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptServerApiUrl.to_string())
                .default(default.api_url)
                .interact_text()?,
            email: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptServerEmail.to_string())
                .default(default.email)
                .interact_text()?,
            timeout_secs: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptServerTimeout.to_string())
                .default(default.timeout_secs)
                .interact_text()?,
            first_name: default.first_name,
        })
    }
}

/// Local persistence settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StorageConfig {
    /// Name of the snapshot slot the store persists into.
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            slot: DEFAULT_SLOT.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "storage".to_string(),
            name: "Local storage".to_string(),
        }
    }

    /// Prompts for the snapshot slot, defaulting to the current one.
    pub fn init(config: &Option<StorageConfig>) -> Result<Self> {
        let default = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleStorage);
        Ok(StorageConfig {
            slot: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptStorageSlot.to_string())
                .default(default.slot)
                .interact_text()?,
        })
    }
}

/// Root configuration object.
///
/// ## Optional Configuration Pattern
///
/// Each module is an `Option` and is left out of the file when unset:
/// - the CLI works offline with no server configured
/// - files written by older versions keep loading when modules are added
///
/// Use [`Config::server`] and [`Config::slot`] rather than the raw fields,
/// since they apply the environment override and the defaults.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// ihsan server connection, `None` until configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Snapshot slot selection, `None` means [`DEFAULT_SLOT`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

impl Config {
    /// Reads `config.json` from the application data directory.
    ///
    /// # Returns
    ///
    /// The stored configuration, the default one when the file does not
    /// exist yet, or an error when the file cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    /// Reads the configuration from an explicit path.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the JSON file
    ///
    /// # Returns
    ///
    /// Same as [`Config::read`]: defaults for a missing file, an error for
    /// invalid JSON.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&config_str)?)
    }

    /// Writes the configuration to `config.json` in the data directory,
    /// creating the directory when needed.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    /// Writes the configuration as pretty-printed JSON to `path`,
    /// replacing any existing file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive setup wizard.
    ///
    /// The user picks the modules to configure; each selected module prompts
    /// for its fields with the current values as defaults. Modules that are
    /// not selected keep their stored settings.
    ///
    /// # Returns
    ///
    /// The updated configuration (not yet saved), or an error if a prompt
    /// fails, e.g. when stdin is not a terminal.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![ServerConfig::module(), StorageConfig::module()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "server" => config.server = Some(ServerConfig::init(&config.server)?),
                "storage" => config.storage = Some(StorageConfig::init(&config.storage)?),
                _ => {}
            }
        }

        Ok(config)
    }

    /// Server settings with the `IHSAN_API_URL` override applied.
    ///
    /// # Returns
    ///
    /// `None` only when neither a server module nor the override is present.
    /// With the override alone, the remaining fields take their defaults.
    pub fn server(&self) -> Option<ServerConfig> {
        let mut server = self.server.clone();
        if let Ok(url) = env::var(API_URL_ENV) {
            let server = server.get_or_insert_with(ServerConfig::default);
            server.api_url = url;
        }
        server
    }

    /// Snapshot slot the store should load and save.
    pub fn slot(&self) -> String {
        self.storage.clone().unwrap_or_default().slot
    }
}
