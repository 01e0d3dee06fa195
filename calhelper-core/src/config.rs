//! calhelper configuration.
//!
//! Read from `~/.config/calhelper/config.toml` and overridden by
//! `CALHELPER_*` environment variables, e.g.
//! `CALHELPER_GOOGLE__DEFAULT_CALENDAR_ID=team@group.calendar.google.com`.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};

pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Google's alias for the account's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_scopes() -> Vec<String> {
    vec![CALENDAR_SCOPE.to_string()]
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelperConfig {
    #[serde(default)]
    pub google: GoogleConfig,
}

/// Settings for the Google driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default = "default_calendar_id")]
    pub default_calendar_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Service account email; defaults to `client_email` from the key file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account_name: Option<String>,

    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Path to the service account JSON key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<PathBuf>,

    /// Pre-issued OAuth access token, used instead of `key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Base URL of the Calendar API, for proxies and local test servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Zone used to read naive dates and render all-day dates
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        GoogleConfig {
            default_calendar_id: default_calendar_id(),
            client_id: None,
            service_account_name: None,
            scopes: default_scopes(),
            key: None,
            access_token: None,
            api_host: None,
            time_zone: default_time_zone(),
        }
    }
}

impl GoogleConfig {
    pub fn time_zone(&self) -> CalendarResult<Tz> {
        self.time_zone
            .parse()
            .map_err(|_| CalendarError::Config(format!("Unknown time zone '{}'", self.time_zone)))
    }

    /// Key path with `~` expanded.
    pub fn key_path(&self) -> CalendarResult<PathBuf> {
        let key = self.key.as_ref().ok_or_else(|| {
            CalendarError::Config("google.key is not set (path to the service account JSON key)".into())
        })?;

        Ok(PathBuf::from(
            shellexpand::tilde(&key.to_string_lossy()).into_owned(),
        ))
    }
}

impl HelperConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("calhelper");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from the default location.
    pub fn load() -> CalendarResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load the config from `path` (which may be missing) plus the environment.
    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        tracing::debug!(path = %path.display(), "loading config");

        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("CALHELPER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("google.scopes")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# calhelper configuration

[google]
# Calendar used when none is given:
# default_calendar_id = \"{DEFAULT_CALENDAR_ID}\"

# Service account credentials:
# service_account_name = \"calhelper@my-project.iam.gserviceaccount.com\"
# key = \"~/.config/calhelper/service-account.json\"
# scopes = [\"{CALENDAR_SCOPE}\"]

# client_id = \"1234567890.apps.googleusercontent.com\"

# Or an access token issued elsewhere (used instead of key):
# access_token = \"ya29...\"

# Calendar API base URL (defaults to the public endpoint):
# api_host = \"https://www.googleapis.com/calendar/v3\"

# Zone for dates without an offset:
# time_zone = \"UTC\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
