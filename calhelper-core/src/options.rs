//! Query options for listing events and recurring-event instances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    /// Provider default (unspecified order)
    #[default]
    Unspecified,
    /// Only valid together with `single_events`
    StartTime,
    Updated,
}

/// Filters for listing the events of a calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOptions {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    /// Free text search
    pub query: Option<String>,
    /// Expand recurring events into their instances
    pub single_events: bool,
    pub show_deleted: bool,
    pub max_attendees: Option<u32>,
    pub order_by: OrderBy,
    /// Zone used in the response
    pub time_zone: Option<String>,
}

/// Filters for listing the instances of one recurring event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstanceOptions {
    pub time_min: Option<DateTime<Utc>>,
    pub time_max: Option<DateTime<Utc>>,
    /// Original start of a single instance to fetch
    pub original_start: Option<String>,
    pub show_deleted: bool,
    pub max_attendees: Option<u32>,
    pub time_zone: Option<String>,
}
