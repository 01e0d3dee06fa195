//! Batched retrieval.
//!
//! Requests are queued and then sent concurrently; responses come back in
//! the order the requests were added. A failing item does not fail the
//! batch, it is reported in its own slot.

use calhelper_core::InstanceOptions;
use futures::future::join_all;
use google_calendar::types::Event;

use crate::api::{ApiError, CalendarApi};

#[derive(Debug, Clone)]
pub enum BatchRequest {
    Event(String),
    Instances(String, InstanceOptions),
}

impl BatchRequest {
    pub fn event_id(&self) -> &str {
        match self {
            BatchRequest::Event(id) | BatchRequest::Instances(id, _) => id,
        }
    }
}

#[derive(Debug)]
pub enum BatchResponse {
    Event(Box<Event>),
    Instances(Vec<Event>),
    NotFound(String),
    Failed { id: String, error: String },
}

pub struct Batch<'a, A: CalendarApi + ?Sized> {
    api: &'a A,
    calendar_id: &'a str,
    requests: Vec<BatchRequest>,
}

impl<'a, A: CalendarApi + ?Sized> Batch<'a, A> {
    pub fn new(api: &'a A, calendar_id: &'a str) -> Self {
        Batch {
            api,
            calendar_id,
            requests: Vec::new(),
        }
    }

    pub fn add(&mut self, request: BatchRequest) {
        self.requests.push(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub async fn execute(self) -> Vec<BatchResponse> {
        tracing::debug!(
            calendar_id = self.calendar_id,
            requests = self.requests.len(),
            "executing batch"
        );

        join_all(self.requests.iter().map(|request| self.run(request))).await
    }

    async fn run(&self, request: &BatchRequest) -> BatchResponse {
        let result = match request {
            BatchRequest::Event(id) => self
                .api
                .get_event(self.calendar_id, id)
                .await
                .map(|e| BatchResponse::Event(Box::new(e))),
            BatchRequest::Instances(id, options) => self
                .api
                .list_instances(self.calendar_id, id, options)
                .await
                .map(BatchResponse::Instances),
        };

        let id = request.event_id().to_string();
        match result {
            Ok(response) => response,
            Err(ApiError::NotFound(_)) => BatchResponse::NotFound(id),
            Err(ApiError::Failed(e)) => BatchResponse::Failed {
                id,
                error: e.to_string(),
            },
        }
    }
}
