//! Core types for calhelper.
//!
//! This crate provides the provider-neutral pieces shared by every driver:
//! - `Event` / `Attendee` and related model types
//! - `time` helpers that turn timestamps and free-form dates into the
//!   RFC3339 / RFC2445 strings calendar APIs expect
//! - the `Driver` trait implemented by concrete calendar backends
//! - `HelperConfig`, loaded from `~/.config/calhelper/config.toml`

pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod options;
pub mod time;

pub use config::{GoogleConfig, HelperConfig};
pub use driver::Driver;
pub use error::{CalendarError, CalendarResult};
pub use event::*;
pub use options::{InstanceOptions, ListOptions, OrderBy};
