//! The interface every calendar backend implements.

use async_trait::async_trait;

use crate::error::CalendarResult;
use crate::event::Event;
use crate::options::{InstanceOptions, ListOptions};

/// A calendar backend bound to one calendar at a time.
///
/// Missing events are not errors: `event` returns `None` and
/// `delete_event` returns `false`. Every other failure is returned as is.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Switch to another calendar. Empty ids are ignored.
    fn set_calendar_id(&mut self, id: &str);

    fn calendar_id(&self) -> &str;

    async fn event(&self, id: &str) -> CalendarResult<Option<Event>>;

    async fn events(&self, options: &ListOptions) -> CalendarResult<Vec<Event>>;

    /// Instances of a recurring event.
    async fn recurrences(&self, id: &str, options: &InstanceOptions) -> CalendarResult<Vec<Event>>;

    /// Fetch several events in one batch, optionally followed by their
    /// instances. Ids that do not exist are skipped.
    async fn specific_events(
        &self,
        ids: &[String],
        with_recurrences: bool,
        options: &InstanceOptions,
    ) -> CalendarResult<Vec<Event>>;

    /// Create `event` on `event.calendar_id` (or the current calendar when empty).
    async fn create_event(&mut self, event: &Event) -> CalendarResult<Event>;

    async fn update_event(&self, event: &Event) -> CalendarResult<Event>;

    async fn delete_event(&self, id: &str) -> CalendarResult<bool>;
}
