use calhelper_core::{
    Attendee, CalendarError, CalendarResult, Event, EventStatus, EventTime, NativeObject,
    ResponseStatus,
};

pub trait FromGoogle<T>: Sized {
    /// Convert a Google object read from `calendar_id`.
    fn from_google(value: T, calendar_id: &str) -> CalendarResult<Self>;
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// `dateTime` wins over `date`; which one is set decides all-day.
fn event_time(
    time: Option<&google_calendar::types::EventDateTime>,
    which: &str,
    event_id: &str,
) -> CalendarResult<EventTime> {
    let missing = || CalendarError::Conversion(format!("Event {event_id} has no {which} time"));
    let time = time.ok_or_else(missing)?;

    if let Some(dt) = time.date_time {
        Ok(EventTime::DateTime(dt))
    } else if let Some(d) = time.date {
        Ok(EventTime::Date(d))
    } else {
        Err(missing())
    }
}

impl FromGoogle<google_calendar::types::Event> for Event {
    fn from_google(event: google_calendar::types::Event, calendar_id: &str) -> CalendarResult<Self> {
        let native = NativeObject::encode(&event)?;

        let start = event_time(event.start.as_ref(), "start", &event.id)?;
        let end = event_time(event.end.as_ref(), "end", &event.id)?;
        let all_day = start.is_date();

        let time_zone = event
            .start
            .as_ref()
            .map(|s| s.time_zone.clone())
            .and_then(non_empty);

        let attendees = event
            .attendees
            .iter()
            .map(|a| Attendee::from_google(a.clone(), calendar_id))
            .map(|a| {
                a.map(|a| Attendee {
                    event_id: event.id.clone(),
                    ..a
                })
            })
            .collect::<CalendarResult<Vec<_>>>()?;

        let parent_id = non_empty(event.recurring_event_id);
        let is_recurrence = parent_id.is_some();

        Ok(Event {
            calendar_id: calendar_id.to_string(),
            id: event.id,
            parent_id,
            title: event.summary,
            description: non_empty(event.description),
            location: non_empty(event.location),
            status: EventStatus::parse(&event.status),
            start,
            end,
            all_day,
            time_zone,
            rrule: event.recurrence.into_iter().next(),
            is_recurrence,
            attendees,
            native: Some(native),
        })
    }
}

impl FromGoogle<google_calendar::types::EventAttendee> for Attendee {
    /// `event_id` is left empty; the owning event fills it in.
    fn from_google(
        attendee: google_calendar::types::EventAttendee,
        _calendar_id: &str,
    ) -> CalendarResult<Self> {
        let native = NativeObject::encode(&attendee)?;

        Ok(Attendee {
            id: non_empty(attendee.id),
            name: non_empty(attendee.display_name),
            status: ResponseStatus::parse(&attendee.response_status),
            email: attendee.email,
            comment: non_empty(attendee.comment),
            event_id: String::new(),
            native: Some(native),
        })
    }
}
