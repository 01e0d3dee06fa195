//! In-memory stand-in for the Google Calendar API.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use calhelper_core::{CalendarError, InstanceOptions, ListOptions};
use chrono::{NaiveDate, TimeZone, Utc};
use google_calendar::types::{Event, EventDateTime};

use crate::api::{ApiError, ApiResult, CalendarApi};

pub fn timed_event(id: &str, summary: &str) -> Event {
    Event {
        id: id.to_string(),
        summary: summary.to_string(),
        status: "confirmed".to_string(),
        start: Some(EventDateTime {
            date: None,
            date_time: Some(Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap()),
            time_zone: String::new(),
        }),
        end: Some(EventDateTime {
            date: None,
            date_time: Some(Utc.with_ymd_and_hms(2025, 3, 20, 9, 30, 0).unwrap()),
            time_zone: String::new(),
        }),
        ..Default::default()
    }
}

pub fn all_day_event(id: &str, summary: &str) -> Event {
    Event {
        id: id.to_string(),
        summary: summary.to_string(),
        status: "confirmed".to_string(),
        start: Some(EventDateTime {
            date: NaiveDate::from_ymd_opt(2025, 1, 1),
            date_time: None,
            time_zone: String::new(),
        }),
        end: Some(EventDateTime {
            date: NaiveDate::from_ymd_opt(2025, 1, 2),
            date_time: None,
            time_zone: String::new(),
        }),
        ..Default::default()
    }
}

/// Instances as Google returns them: the first one starts with the master.
pub fn instances_of(master: &Event, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| {
            let mut instance = master.clone();
            instance.id = format!("{}_{}", master.id, i);
            instance.recurring_event_id = master.id.clone();
            instance.recurrence = vec![];
            instance
        })
        .collect()
}

#[derive(Default)]
pub struct MemoryApi {
    /// calendar id -> event id -> event
    pub calendars: Mutex<HashMap<String, HashMap<String, Event>>>,
    /// master event id -> instances
    pub instances: Mutex<HashMap<String, Vec<Event>>>,
    /// event ids whose reads fail with a server error
    pub failing: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl MemoryApi {
    pub fn with_events(calendar_id: &str, events: Vec<Event>) -> Self {
        let api = MemoryApi::default();
        api.calendars.lock().unwrap().insert(
            calendar_id.to_string(),
            events.into_iter().map(|e| (e.id.clone(), e)).collect(),
        );
        api
    }

    pub fn add_instances(&self, master_id: &str, instances: Vec<Event>) {
        self.instances
            .lock()
            .unwrap()
            .insert(master_id.to_string(), instances);
    }

    pub fn fail_on(&self, event_id: &str) {
        self.failing.lock().unwrap().push(event_id.to_string());
    }

    pub fn stored(&self, calendar_id: &str, event_id: &str) -> Option<Event> {
        self.calendars
            .lock()
            .unwrap()
            .get(calendar_id)
            .and_then(|events| events.get(event_id))
            .cloned()
    }

    fn check_failing(&self, event_id: &str) -> ApiResult<()> {
        if self.failing.lock().unwrap().iter().any(|id| id == event_id) {
            return Err(ApiError::Failed(CalendarError::Api(format!(
                "event {event_id}: HTTP 500 Internal Server Error"
            ))));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarApi for MemoryApi {
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ApiResult<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing(event_id)?;

        self.stored(calendar_id, event_id)
            .ok_or_else(|| ApiError::NotFound(format!("event {event_id}")))
    }

    async fn list_events(&self, calendar_id: &str, options: &ListOptions) -> ApiResult<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let calendars = self.calendars.lock().unwrap();
        let mut events: Vec<Event> = calendars
            .get(calendar_id)
            .map(|events| events.values().cloned().collect())
            .unwrap_or_default();
        events.sort_by(|a, b| a.id.cmp(&b.id));

        if let Some(query) = &options.query {
            events.retain(|e| e.summary.contains(query.as_str()));
        }

        Ok(events)
    }

    async fn list_instances(
        &self,
        calendar_id: &str,
        event_id: &str,
        _options: &InstanceOptions,
    ) -> ApiResult<Vec<Event>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing(event_id)?;

        if self.stored(calendar_id, event_id).is_none() {
            return Err(ApiError::NotFound(format!("instances of {event_id}")));
        }

        Ok(self
            .instances
            .lock()
            .unwrap()
            .get(event_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> ApiResult<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut created = event.clone();
        created.id = format!("gen{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        if created.status.is_empty() {
            created.status = "confirmed".to_string();
        }

        self.calendars
            .lock()
            .unwrap()
            .entry(calendar_id.to_string())
            .or_default()
            .insert(created.id.clone(), created.clone());

        Ok(created)
    }

    async fn update_event(&self, calendar_id: &str, event_id: &str, event: &Event) -> ApiResult<Event> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut calendars = self.calendars.lock().unwrap();
        let stored = calendars
            .get_mut(calendar_id)
            .and_then(|events| events.get_mut(event_id))
            .ok_or_else(|| ApiError::NotFound(format!("update event {event_id}")))?;

        *stored = event.clone();
        stored.id = event_id.to_string();
        Ok(stored.clone())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ApiResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing(event_id)?;

        self.calendars
            .lock()
            .unwrap()
            .get_mut(calendar_id)
            .and_then(|events| events.remove(event_id))
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(format!("delete event {event_id}")))
    }
}
