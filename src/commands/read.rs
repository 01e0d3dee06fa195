use anyhow::Result;
use calhelper_core::{Driver, InstanceOptions, ListOptions, OrderBy};
use chrono_tz::Tz;

use super::{Options, parse_instant, print_event, print_events};

pub struct ListArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub query: Option<String>,
    pub single_events: bool,
    pub show_deleted: bool,
}

impl ListArgs {
    fn to_options(&self, tz: Tz) -> Result<ListOptions> {
        Ok(ListOptions {
            time_min: self.from.as_deref().map(|s| parse_instant(s, tz)).transpose()?,
            time_max: self.to.as_deref().map(|s| parse_instant(s, tz)).transpose()?,
            query: self.query.clone().filter(|q| !q.is_empty()),
            single_events: self.single_events,
            show_deleted: self.show_deleted,
            // Ordering by start time is only allowed on expanded listings
            order_by: if self.single_events {
                OrderBy::StartTime
            } else {
                OrderBy::Unspecified
            },
            ..Default::default()
        })
    }
}

fn instance_options(from: Option<&str>, to: Option<&str>, tz: Tz) -> Result<InstanceOptions> {
    Ok(InstanceOptions {
        time_min: from.map(|s| parse_instant(s, tz)).transpose()?,
        time_max: to.map(|s| parse_instant(s, tz)).transpose()?,
        ..Default::default()
    })
}

pub async fn get(options: &Options, id: &str) -> Result<()> {
    let config = options.load_config()?;
    let driver = options.driver(&config).await?;

    match driver.event(id).await? {
        Some(event) => print_event(&event, options.raw),
        None => anyhow::bail!("Event '{}' not found in calendar '{}'", id, driver.calendar_id()),
    }
}

pub async fn list(options: &Options, args: ListArgs) -> Result<()> {
    let config = options.load_config()?;
    let tz = config.google.time_zone()?;
    let driver = options.driver(&config).await?;

    let events = driver.events(&args.to_options(tz)?).await?;
    print_events(&events, options.raw)
}

pub async fn instances(options: &Options, id: &str, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let config = options.load_config()?;
    let tz = config.google.time_zone()?;
    let driver = options.driver(&config).await?;

    let events = driver.recurrences(id, &instance_options(from, to, tz)?).await?;
    print_events(&events, options.raw)
}

pub async fn batch(options: &Options, ids: &[String], with_recurrences: bool) -> Result<()> {
    let config = options.load_config()?;
    let driver = options.driver(&config).await?;

    let events = driver
        .specific_events(ids, with_recurrences, &InstanceOptions::default())
        .await?;

    if events.is_empty() {
        eprintln!("None of the {} requested events were found", ids.len());
    }
    print_events(&events, options.raw)
}
