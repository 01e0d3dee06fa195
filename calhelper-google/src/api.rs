//! Thin seam over the `google_calendar` client.
//!
//! The driver only talks to [`CalendarApi`], so every vendor call lives in
//! this file and tests can swap in an in-memory calendar.

use async_trait::async_trait;
use calhelper_core::{CalendarError, InstanceOptions, ListOptions, OrderBy};
use google_calendar::types::{Event, SendUpdates};
use google_calendar::{ClientError, StatusCode};
use thiserror::Error;

use crate::session::Session;

/// Failure of a single API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 404 / 410 from the API
    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Failed(#[from] CalendarError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Sort a client error into not-found or a failure. Deleted events
    /// answer 410 Gone.
    pub fn classify(error: ClientError, context: &str) -> Self {
        match &error {
            ClientError::HttpError { status, .. }
                if *status == StatusCode::NOT_FOUND || *status == StatusCode::GONE =>
            {
                ApiError::NotFound(context.to_string())
            }
            _ => ApiError::Failed(CalendarError::Api(format!("{context}: {error}"))),
        }
    }
}

impl From<ApiError> for CalendarError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::NotFound(what) => CalendarError::Api(format!("Not found: {what}")),
            ApiError::Failed(e) => e,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Event endpoints of the Google Calendar API.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ApiResult<Event>;

    async fn list_events(&self, calendar_id: &str, options: &ListOptions) -> ApiResult<Vec<Event>>;

    async fn list_instances(
        &self,
        calendar_id: &str,
        event_id: &str,
        options: &InstanceOptions,
    ) -> ApiResult<Vec<Event>>;

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> ApiResult<Event>;

    async fn update_event(&self, calendar_id: &str, event_id: &str, event: &Event) -> ApiResult<Event>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ApiResult<()>;
}

/// The real API, authorized by a [`Session`].
pub struct GoogleApi {
    session: Session,
    host: Option<String>,
}

impl GoogleApi {
    pub fn new(session: Session) -> Self {
        GoogleApi { session, host: None }
    }

    /// Send requests to `host` instead of the public endpoint.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    async fn client(&self) -> ApiResult<google_calendar::Client> {
        let mut client = self.session.client().await?;
        if let Some(host) = &self.host {
            client.with_host_override(host);
        }
        Ok(client)
    }
}

fn order_by(order: OrderBy) -> google_calendar::types::OrderBy {
    match order {
        OrderBy::Unspecified => google_calendar::types::OrderBy::default(),
        OrderBy::StartTime => google_calendar::types::OrderBy::StartTime,
        OrderBy::Updated => google_calendar::types::OrderBy::Updated,
    }
}

fn rfc3339(dt: Option<chrono::DateTime<chrono::Utc>>) -> String {
    dt.map(|dt| dt.to_rfc3339()).unwrap_or_default()
}

#[async_trait]
impl CalendarApi for GoogleApi {
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> ApiResult<Event> {
        let client = self.client().await?;

        let response = client
            .events()
            .get(calendar_id, event_id, 0, "")
            .await
            .map_err(|e| ApiError::classify(e, &format!("event {event_id}")))?;

        Ok(response.body)
    }

    async fn list_events(&self, calendar_id: &str, options: &ListOptions) -> ApiResult<Vec<Event>> {
        let client = self.client().await?;

        let response = client
            .events()
            .list_all(
                calendar_id,
                "",
                options.max_attendees.map(i64::from).unwrap_or(0),
                order_by(options.order_by),
                &[],
                options.query.as_deref().unwrap_or(""),
                &[],
                options.show_deleted,
                false,
                options.single_events,
                &rfc3339(options.time_max),
                &rfc3339(options.time_min),
                options.time_zone.as_deref().unwrap_or(""),
                "",
            )
            .await
            .map_err(|e| ApiError::classify(e, &format!("events of {calendar_id}")))?;

        Ok(response.body)
    }

    async fn list_instances(
        &self,
        calendar_id: &str,
        event_id: &str,
        options: &InstanceOptions,
    ) -> ApiResult<Vec<Event>> {
        let client = self.client().await?;

        let response = client
            .events()
            .get_all_instances(
                calendar_id,
                event_id,
                options.max_attendees.map(i64::from).unwrap_or(0),
                options.original_start.as_deref().unwrap_or(""),
                options.show_deleted,
                &rfc3339(options.time_max),
                &rfc3339(options.time_min),
                options.time_zone.as_deref().unwrap_or(""),
            )
            .await
            .map_err(|e| ApiError::classify(e, &format!("instances of {event_id}")))?;

        Ok(response.body)
    }

    async fn insert_event(&self, calendar_id: &str, event: &Event) -> ApiResult<Event> {
        let client = self.client().await?;

        let response = client
            .events()
            .insert(calendar_id, 0, 0, false, SendUpdates::None, false, event)
            .await
            .map_err(|e| ApiError::classify(e, &format!("create event '{}'", event.summary)))?;

        Ok(response.body)
    }

    async fn update_event(&self, calendar_id: &str, event_id: &str, event: &Event) -> ApiResult<Event> {
        let client = self.client().await?;

        let response = client
            .events()
            .update(
                calendar_id,
                event_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                event,
            )
            .await
            .map_err(|e| ApiError::classify(e, &format!("update event {event_id}")))?;

        Ok(response.body)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> ApiResult<()> {
        let client = self.client().await?;

        client
            .events()
            .delete(calendar_id, event_id, false, SendUpdates::None)
            .await
            .map_err(|e| ApiError::classify(e, &format!("delete event {event_id}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calhelper_core::GoogleConfig;
    use chrono::{TimeZone, Utc};
    use google_calendar::HeaderMap;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_error(status: StatusCode, body: &str) -> ClientError {
        ClientError::HttpError {
            status,
            headers: HeaderMap::new(),
            error: body.to_string(),
        }
    }

    fn api(server: &MockServer) -> GoogleApi {
        let session = Session::with_token("test-token", &GoogleConfig::default());
        GoogleApi::new(session).with_host(server.uri())
    }

    fn event_json(id: &str, summary: &str) -> serde_json::Value {
        json!({
            "id": id,
            "summary": summary,
            "status": "confirmed",
            "start": {"dateTime": "2025-03-20T09:00:00Z"},
            "end": {"dateTime": "2025-03-20T09:30:00Z"}
        })
    }

    #[test]
    fn test_classify_not_found_and_gone() {
        let err = ApiError::classify(http_error(StatusCode::NOT_FOUND, "{}"), "event abc");
        assert!(err.is_not_found());

        let err = ApiError::classify(http_error(StatusCode::GONE, "{}"), "delete event abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_classify_only_looks_at_status() {
        // The body mentions 404 but the call was rejected
        let err = ApiError::classify(
            http_error(StatusCode::FORBIDDEN, "rateLimitExceeded after 404 retries: Not Found"),
            "event abc",
        );
        assert!(!err.is_not_found());

        match CalendarError::from(err) {
            CalendarError::Api(msg) => {
                assert!(msg.starts_with("event abc: "));
                assert!(msg.contains("403"));
                assert!(msg.contains("rateLimitExceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = ApiError::classify(ClientError::EmptyRefreshToken, "event abc");
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_event_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/abc"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(event_json("abc", "Standup")))
            .expect(1)
            .mount(&server)
            .await;

        let event = api(&server).get_event("primary", "abc").await.unwrap();

        assert_eq!(event.id, "abc");
        assert_eq!(event.summary, "Standup");
        assert_eq!(
            event.start.unwrap().date_time,
            Some(Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_get_missing_event_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "Not Found"}
            })))
            .mount(&server)
            .await;

        let err = api(&server).get_event("primary", "missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_forbidden_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/abc"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "Calendar usage limits exceeded."}
            })))
            .mount(&server)
            .await;

        let err = api(&server).get_event("primary", "abc").await.unwrap_err();
        assert!(matches!(err, ApiError::Failed(CalendarError::Api(_))));
    }

    #[tokio::test]
    async fn test_list_instances() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events/m/instances"))
            .and(query_param("timeMin", "2025-03-01T00:00:00+00:00"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [event_json("m_0", "Weekly"), event_json("m_1", "Weekly")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = InstanceOptions {
            time_min: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        let instances = api(&server).list_instances("primary", "m", &options).await.unwrap();

        let ids: Vec<&str> = instances.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["m_0", "m_1"]);
    }

    #[tokio::test]
    async fn test_list_events_passes_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/team/events"))
            .and(query_param("q", "standup"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("orderBy", "startTime"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [event_json("a", "Standup")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = ListOptions {
            query: Some("standup".to_string()),
            single_events: true,
            order_by: OrderBy::StartTime,
            ..Default::default()
        };
        let events = api(&server).list_events("team", &options).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_event_posts_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(body_partial_json(json!({"summary": "Planning"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(event_json("new1", "Planning")))
            .expect(1)
            .mount(&server)
            .await;

        let event = Event {
            summary: "Planning".to_string(),
            ..Default::default()
        };
        let created = api(&server).insert_event("primary", &event).await.unwrap();
        assert_eq!(created.id, "new1");
    }

    #[tokio::test]
    async fn test_delete_gone_event_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/old"))
            .respond_with(ResponseTemplate::new(410).set_body_json(json!({
                "error": {"code": 410, "message": "Resource has been deleted"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/abc"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let api = api(&server);
        assert!(api.delete_event("primary", "old").await.unwrap_err().is_not_found());
        api.delete_event("primary", "abc").await.unwrap();
    }
}
