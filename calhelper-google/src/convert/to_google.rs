use calhelper_core::{CalendarResult, Event, EventTime};

/// Prefixes Google accepts in an event's recurrence list.
const RECURRENCE_PREFIXES: &[&str] = &["RRULE:", "EXRULE:", "RDATE", "EXDATE"];

pub trait ToGoogle {
    fn to_google(&self) -> CalendarResult<google_calendar::types::Event>;
}

impl ToGoogle for Event {
    /// Write the model's fields onto
    /// the native object (or a blank one for events not read from Google).
    fn to_google(&self) -> CalendarResult<google_calendar::types::Event> {
        let mut google_event: google_calendar::types::Event = match &self.native {
            Some(native) => native.decode()?,
            None => google_calendar::types::Event::default(),
        };

        google_event.summary = self.title.clone();
        google_event.description = self.description.clone().unwrap_or_default();
        google_event.location = self.location.clone().unwrap_or_default();
        google_event.status = self.status.as_str().to_string();

        google_event.start = Some(event_time_to_google(&self.start, self.all_day, &self.time_zone));
        google_event.end = Some(event_time_to_google(&self.end, self.all_day, &self.time_zone));

        // An empty rule leaves whatever recurrence the event already has
        if let Some(rrule) = self.rrule.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            google_event.recurrence = vec![recurrence_line(rrule)];
        }

        Ok(google_event)
    }
}

/// All-day events only carry `date`, timed events only `dateTime`.
fn event_time_to_google(
    time: &EventTime,
    all_day: bool,
    time_zone: &Option<String>,
) -> google_calendar::types::EventDateTime {
    let time_zone = time_zone.clone().unwrap_or_default();

    if all_day {
        google_calendar::types::EventDateTime {
            date: Some(time.date()),
            date_time: None,
            time_zone,
        }
    } else {
        let date_time = match time {
            EventTime::DateTime(dt) => *dt,
            EventTime::Date(d) => d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
        };

        google_calendar::types::EventDateTime {
            date: None,
            date_time: Some(date_time),
            time_zone,
        }
    }
}

fn recurrence_line(rrule: &str) -> String {
    if RECURRENCE_PREFIXES.iter().any(|p| rrule.starts_with(p)) {
        rrule.to_string()
    } else {
        format!("RRULE:{rrule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::FromGoogle;
    use crate::testing::timed_event;
    use calhelper_core::{EventStatus, NativeObject};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn new_event() -> Event {
        Event::new(
            "Planning",
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 4, 1, 13, 0, 0).unwrap()),
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 4, 1, 14, 0, 0).unwrap()),
        )
    }

    #[test]
    fn test_timed_event_sets_date_time_only() {
        let mut event = new_event();
        event.time_zone = Some("Europe/Berlin".to_string());
        event.location = Some("Room 4".to_string());

        let google = event.to_google().unwrap();
        let start = google.start.unwrap();

        assert_eq!(google.summary, "Planning");
        assert_eq!(google.location, "Room 4");
        assert_eq!(google.description, "");
        assert_eq!(start.date, None);
        assert_eq!(start.date_time, Some(Utc.with_ymd_and_hms(2025, 4, 1, 13, 0, 0).unwrap()));
        assert_eq!(start.time_zone, "Europe/Berlin");
        assert!(google.recurrence.is_empty());
        assert_eq!(google.id, "");
        assert_eq!(google.status, "confirmed");
    }

    #[test]
    fn test_status_is_written() {
        let mut event = Event::from_google(timed_event("abc", "Standup"), "primary").unwrap();
        event.status = EventStatus::Tentative;

        assert_eq!(event.to_google().unwrap().status, "tentative");
    }

    #[test]
    fn test_all_day_event_sets_date_only() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let event = Event::new("Holiday", EventTime::Date(d), EventTime::Date(d.succ_opt().unwrap()));

        let google = event.to_google().unwrap();
        let end = google.end.unwrap();

        assert_eq!(end.date, Some(NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()));
        assert_eq!(end.date_time, None);
    }

    #[test]
    fn test_all_day_flag_wins_over_time_variant() {
        let mut event = new_event();
        event.all_day = true;

        let google = event.to_google().unwrap();
        assert_eq!(google.start.unwrap().date, Some(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()));
    }

    #[test]
    fn test_recurrence_only_set_for_non_empty_rule() {
        let mut event = new_event();
        event.rrule = Some("FREQ=DAILY;COUNT=3".to_string());
        assert_eq!(
            event.to_google().unwrap().recurrence,
            vec!["RRULE:FREQ=DAILY;COUNT=3".to_string()]
        );

        event.rrule = Some("RRULE:FREQ=WEEKLY".to_string());
        assert_eq!(event.to_google().unwrap().recurrence, vec!["RRULE:FREQ=WEEKLY".to_string()]);

        event.rrule = Some("   ".to_string());
        assert!(event.to_google().unwrap().recurrence.is_empty());
    }

    #[test]
    fn test_update_keeps_native_fields() {
        let mut google = timed_event("abc", "Old title");
        google.recurrence = vec!["RRULE:FREQ=MONTHLY".to_string()];
        google.transparency = "transparent".to_string();

        let mut event = Event::from_google(google, "primary").unwrap();
        event.title = "New title".to_string();
        event.rrule = None;

        let updated = event.to_google().unwrap();
        assert_eq!(updated.id, "abc");
        assert_eq!(updated.summary, "New title");
        assert_eq!(updated.transparency, "transparent");
        assert_eq!(updated.recurrence, vec!["RRULE:FREQ=MONTHLY".to_string()]);
    }

    #[test]
    fn test_corrupt_native_object_is_an_error() {
        let mut event = new_event();
        event.native = Some(NativeObject(serde_json::json!("not an event")));
        assert!(event.to_google().is_err());
    }
}
