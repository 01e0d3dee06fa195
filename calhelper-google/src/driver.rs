//! Google Calendar implementation of [`Driver`].

use async_trait::async_trait;
use calhelper_core::{
    CalendarError, CalendarResult, Driver, Event, GoogleConfig, InstanceOptions, ListOptions,
};
use tracing::{debug, info, warn};

use crate::api::{ApiError, CalendarApi, GoogleApi};
use crate::batch::{Batch, BatchRequest, BatchResponse};
use crate::convert::{FromGoogle, ToGoogle};
use crate::session::Session;

pub struct GoogleDriver<A = GoogleApi> {
    api: A,
    calendar_id: String,
}

impl GoogleDriver<GoogleApi> {
    /// Driver on the configured default calendar, authorized with the
    /// configured access token or service account.
    pub async fn from_config(config: &GoogleConfig) -> CalendarResult<Self> {
        let session = Session::from_config(config).await?;

        let mut api = GoogleApi::new(session);
        if let Some(host) = &config.api_host {
            api = api.with_host(host.trim_end_matches('/'));
        }

        info!(calendar_id = %config.default_calendar_id, "google driver ready");

        Ok(Self::with_api(api, &config.default_calendar_id))
    }
}

impl<A: CalendarApi> GoogleDriver<A> {
    pub fn with_api(api: A, calendar_id: &str) -> Self {
        GoogleDriver {
            api,
            calendar_id: calendar_id.to_string(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn convert(&self, event: google_calendar::types::Event) -> CalendarResult<Event> {
        Event::from_google(event, &self.calendar_id)
    }

    /// Convert a listing, dropping events Google returns without times
    /// (cancelled instances only carry an id and a status).
    fn convert_all(&self, events: Vec<google_calendar::types::Event>) -> Vec<Event> {
        events
            .into_iter()
            .filter_map(|event| match self.convert(event) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(error = %e, "skipping event");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl<A: CalendarApi> Driver for GoogleDriver<A> {
    fn set_calendar_id(&mut self, id: &str) {
        if !id.is_empty() {
            self.calendar_id = id.to_string();
        }
    }

    fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    async fn event(&self, id: &str) -> CalendarResult<Option<Event>> {
        match self.api.get_event(&self.calendar_id, id).await {
            Ok(event) => Ok(Some(self.convert(event)?)),
            Err(ApiError::NotFound(_)) => {
                debug!(event_id = id, "event not found");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn events(&self, options: &ListOptions) -> CalendarResult<Vec<Event>> {
        let events = self.api.list_events(&self.calendar_id, options).await?;
        debug!(calendar_id = %self.calendar_id, count = events.len(), "listed events");

        Ok(self.convert_all(events))
    }

    async fn recurrences(&self, id: &str, options: &InstanceOptions) -> CalendarResult<Vec<Event>> {
        let events = self.api.list_instances(&self.calendar_id, id, options).await?;

        Ok(self.convert_all(events))
    }

    async fn specific_events(
        &self,
        ids: &[String],
        with_recurrences: bool,
        options: &InstanceOptions,
    ) -> CalendarResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut batch = Batch::new(&self.api, &self.calendar_id);
        for id in ids {
            batch.add(BatchRequest::Event(id.clone()));

            if with_recurrences {
                batch.add(BatchRequest::Instances(id.clone(), options.clone()));
            }
        }

        let mut events = Vec::new();
        for response in batch.execute().await {
            match response {
                BatchResponse::Event(event) => match self.convert(*event) {
                    Ok(event) => events.push(event),
                    Err(e) => warn!(error = %e, "skipping batch event"),
                },
                // The first instance is the master event, already returned above
                BatchResponse::Instances(instances) => {
                    events.extend(self.convert_all(instances.into_iter().skip(1).collect()));
                }
                BatchResponse::NotFound(id) => debug!(event_id = %id, "event not found"),
                BatchResponse::Failed { id, error } => {
                    warn!(event_id = %id, error = %error, "batch item failed")
                }
            }
        }

        Ok(events)
    }

    async fn create_event(&mut self, event: &Event) -> CalendarResult<Event> {
        self.set_calendar_id(&event.calendar_id);

        // Let Google assign the id
        let mut google_event = event.to_google()?;
        google_event.id = String::new();

        let created = self.api.insert_event(&self.calendar_id, &google_event).await?;
        info!(event_id = %created.id, calendar_id = %self.calendar_id, "created event");

        self.convert(created)
    }

    async fn update_event(&self, event: &Event) -> CalendarResult<Event> {
        if event.id.is_empty() {
            return Err(CalendarError::Conversion(
                "Cannot update an event without an id".into(),
            ));
        }

        let mut google_event = event.to_google()?;
        google_event.id = event.id.clone();

        let updated = self
            .api
            .update_event(&self.calendar_id, &event.id, &google_event)
            .await?;
        info!(event_id = %updated.id, "updated event");

        self.convert(updated)
    }

    async fn delete_event(&self, id: &str) -> CalendarResult<bool> {
        match self.api.delete_event(&self.calendar_id, id).await {
            Ok(()) => {
                info!(event_id = id, "deleted event");
                Ok(true)
            }
            Err(ApiError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
