//! Google Calendar driver for calhelper.
//!
//! Maps `google_calendar` events to and from the provider-neutral
//! [`calhelper_core::Event`] model and implements [`calhelper_core::Driver`]
//! on top of the event endpoints:
//!
//! - [`api`] - the vendor calls, behind the [`CalendarApi`] trait
//! - [`session`] - service account or access token authorization
//! - [`convert`] - `FromGoogle` / `ToGoogle`
//! - [`batch`] - batched retrieval of events and their instances
//! - [`driver`] - [`GoogleDriver`]

pub mod api;
pub mod batch;
pub mod convert;
pub mod driver;
pub mod session;

#[cfg(test)]
mod testing;

pub use api::{ApiError, CalendarApi, GoogleApi};
pub use driver::GoogleDriver;
pub use session::Session;
