//! Provider-neutral event types.
//!
//! Drivers build these fresh from every API response and callers discard
//! them after use. The vendor's own object travels along in `native` so a
//! later update can be written on top of it without losing fields this
//! model does not carry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Calendar the event belongs to
    pub calendar_id: String,
    pub id: String,
    /// Id of the recurring event this is an instance of
    pub parent_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: EventStatus,
    pub start: EventTime,
    pub end: EventTime,
    pub all_day: bool,
    /// IANA time zone sent along with start/end
    pub time_zone: Option<String>,

    // Recurrence fields
    /// First recurrence line (e.g. "RRULE:FREQ=WEEKLY;BYDAY=MO")
    pub rrule: Option<String>,
    /// True when this event is an instance of a recurring event
    pub is_recurrence: bool,

    pub attendees: Vec<Attendee>,

    /// The provider's native event object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeObject>,
}

impl Event {
    /// A new timed or all-day event that has not been sent to any provider yet.
    pub fn new(title: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        let all_day = start.is_date();
        Event {
            title: title.into(),
            start,
            end,
            all_day,
            ..Default::default()
        }
    }
}

/// An event attendee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    pub status: Option<ResponseStatus>,
    pub email: String,
    pub comment: Option<String>,
    /// Id of the owning event
    pub event_id: String,

    /// The provider's native attendee object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeObject>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResponseStatus {
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

impl ResponseStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "needsAction" => Some(ResponseStatus::NeedsAction),
            "declined" => Some(ResponseStatus::Declined),
            "tentative" => Some(ResponseStatus::Tentative),
            "accepted" => Some(ResponseStatus::Accepted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Confirmed => "confirmed",
            EventStatus::Tentative => "tentative",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Unknown values fall back to `Confirmed`.
    pub fn parse(s: &str) -> Self {
        match s {
            "tentative" => EventStatus::Tentative,
            "cancelled" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        }
    }
}

/// Start or end of an event: a UTC instant, or a calendar date for all-day events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl Default for EventTime {
    fn default() -> Self {
        EventTime::DateTime(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Calendar date, for either variant.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::DateTime(dt) => dt.date_naive(),
            EventTime::Date(d) => *d,
        }
    }
}

/// Opaque, serialized copy of a provider object.
///
/// Core never looks inside; the driver that produced it decodes it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeObject(pub serde_json::Value);

impl NativeObject {
    pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Self> {
        serde_json::to_value(value).map(NativeObject)
    }

    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_value(self.0.clone())
    }
}
