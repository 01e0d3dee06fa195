pub mod dates;
pub mod read;
pub mod write;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calhelper_core::time::{self, DateInput};
use calhelper_core::{Driver, Event, HelperConfig};
use calhelper_google::GoogleDriver;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Global flags shared by every command.
pub struct Options {
    pub calendar: Option<String>,
    pub config: Option<PathBuf>,
    pub raw: bool,
}

impl Options {
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(HelperConfig::config_path()?),
        }
    }

    pub fn load_config(&self) -> Result<HelperConfig> {
        let path = self.config_path()?;
        HelperConfig::load_from(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Driver on `--calendar`, or the configured default calendar.
    pub async fn driver(&self, config: &HelperConfig) -> Result<GoogleDriver> {
        if config.google.key.is_none() && config.google.access_token.is_none() {
            anyhow::bail!(
                "No Google credentials configured.\n\
                Run `calhelper init-config`, then set google.key or google.access_token in {}",
                self.config_path()?.display()
            );
        }

        let mut driver = GoogleDriver::from_config(&config.google).await?;
        if let Some(calendar) = &self.calendar {
            driver.set_calendar_id(calendar);
        }
        Ok(driver)
    }
}

/// Parse a user supplied date (`--from`, `--to`, ...) in the configured zone.
pub fn parse_instant(input: &str, tz: Tz) -> Result<DateTime<Utc>> {
    Ok(time::parse_date_input(&DateInput::parse(input), tz, Utc::now())?)
}

pub fn print_events(events: &[Event], raw: bool) -> Result<()> {
    let events: Vec<Event> = events.iter().map(|e| for_output(e, raw)).collect();
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}

pub fn print_event(event: &Event, raw: bool) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&for_output(event, raw))?);
    Ok(())
}

/// Native objects are only printed with `--raw`.
fn for_output(event: &Event, raw: bool) -> Event {
    let mut event = event.clone();
    if !raw {
        event.native = None;
        for attendee in &mut event.attendees {
            attendee.native = None;
        }
    }
    event
}

pub fn init_config(options: &Options) -> Result<()> {
    let path = options.config_path()?;

    if path.exists() {
        anyhow::bail!("Config already exists at {}", path.display());
    }

    HelperConfig::create_default_config(&path)?;
    println!("Created config at {}", path.display());
    println!("Set google.key to your service account JSON key (or google.access_token) to get started.");
    Ok(())
}
