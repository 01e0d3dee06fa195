use anyhow::{Context, Result};
use calhelper_core::time::{self, DateInput};
use calhelper_core::{Driver, Event, EventTime};
use chrono::NaiveDate;
use chrono_tz::Tz;

use super::{Options, print_event};

pub struct CreateArgs {
    pub title: String,
    pub start: String,
    pub end: String,
    pub all_day: bool,
    pub description: Option<String>,
    pub location: Option<String>,
    pub rrule: Option<String>,
    pub until: Option<String>,
    pub time_zone: Option<String>,
}

#[derive(Default)]
pub struct UpdateArgs {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub all_day: Option<bool>,
    pub rrule: Option<String>,
}

fn parse_zone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| anyhow::anyhow!("Unknown time zone '{}' (expected an IANA name like Europe/Berlin)", name))
}

/// Build the event to insert. The end of an all-day event is the last day
/// it covers.
fn build_event(args: CreateArgs, tz: Tz) -> Result<Event> {
    let start = time::event_time(&DateInput::parse(&args.start), args.all_day, false, tz)
        .with_context(|| format!("Invalid start '{}'", args.start))?;
    let end = time::event_time(&DateInput::parse(&args.end), args.all_day, true, tz)
        .with_context(|| format!("Invalid end '{}'", args.end))?;

    if ends_before_start(&start, &end) {
        anyhow::bail!("Event ends before it starts");
    }

    let rrule = match (args.rrule, args.until) {
        (Some(rrule), Some(until)) => Some(time::with_until(&rrule, DateInput::parse(&until))?),
        (rrule, _) => rrule,
    };

    let mut event = Event::new(args.title, start, end);
    event.all_day = args.all_day;
    event.description = args.description;
    event.location = args.location;
    event.rrule = rrule;
    event.time_zone = Some(tz.name().to_string());
    Ok(event)
}

/// Calendar day of `time` as seen in `tz`.
fn local_date(time: &EventTime, tz: Tz) -> NaiveDate {
    match time {
        EventTime::Date(date) => *date,
        EventTime::DateTime(dt) => dt.with_timezone(&tz).date_naive(),
    }
}

fn ends_before_start(start: &EventTime, end: &EventTime) -> bool {
    match (start, end) {
        (EventTime::DateTime(s), EventTime::DateTime(e)) => e < s,
        _ => end.date() < start.date(),
    }
}

/// Apply the given changes to a fetched event.
fn apply_update(event: &mut Event, args: UpdateArgs, tz: Tz) -> Result<()> {
    if let Some(title) = args.title {
        event.title = title;
    }
    if let Some(description) = args.description {
        event.description = Some(description);
    }
    if let Some(location) = args.location {
        event.location = Some(location);
    }

    if let Some(all_day) = args.all_day
        && all_day != event.all_day
    {
        event.all_day = all_day;
        if all_day {
            // Keep the days the timed event touched
            let start = local_date(&event.start, tz);
            let end = local_date(&event.end, tz);
            event.start = EventTime::Date(start);
            event.end = EventTime::Date(end.succ_opt().unwrap_or(end));
        }
    }

    if let Some(start) = args.start {
        event.start = time::event_time(&DateInput::parse(&start), event.all_day, false, tz)
            .with_context(|| format!("Invalid start '{}'", start))?;
    }
    if let Some(end) = args.end {
        event.end = time::event_time(&DateInput::parse(&end), event.all_day, true, tz)
            .with_context(|| format!("Invalid end '{}'", end))?;
    }

    if let Some(rrule) = args.rrule {
        event.rrule = Some(rrule);
    }
    Ok(())
}

pub async fn create(options: &Options, args: CreateArgs) -> Result<()> {
    let config = options.load_config()?;
    let tz = match &args.time_zone {
        Some(name) => parse_zone(name)?,
        None => config.google.time_zone()?,
    };
    let mut driver = options.driver(&config).await?;

    let event = build_event(args, tz)?;
    let created = driver.create_event(&event).await?;

    eprintln!("Created event {} in {}", created.id, driver.calendar_id());
    print_event(&created, options.raw)
}

pub async fn update(options: &Options, id: &str, args: UpdateArgs) -> Result<()> {
    let config = options.load_config()?;
    let tz = config.google.time_zone()?;
    let driver = options.driver(&config).await?;

    let Some(mut event) = driver.event(id).await? else {
        anyhow::bail!("Event '{}' not found in calendar '{}'", id, driver.calendar_id());
    };

    apply_update(&mut event, args, tz)?;
    let updated = driver.update_event(&event).await?;

    eprintln!("Updated event {}", updated.id);
    print_event(&updated, options.raw)
}

pub async fn delete(options: &Options, id: &str) -> Result<()> {
    let config = options.load_config()?;
    let driver = options.driver(&config).await?;

    if !driver.delete_event(id).await? {
        anyhow::bail!("Event '{}' not found in calendar '{}'", id, driver.calendar_id());
    }

    println!("Deleted event {}", id);
    Ok(())
}
