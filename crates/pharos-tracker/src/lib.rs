//! Embeddable collector client.
//!
//! `pharos-tracker` captures page-view events inside a host application and
//! delivers them best-effort to a Pharos collector endpoint. The tracker is
//! deliberately unobtrusive: it never blocks the host, never surfaces
//! transport or storage faults, and sends each event at most once.

pub mod event;
pub mod identity;
pub mod page;
pub mod tracker;

mod transport;
mod watcher;

pub use event::{PageView, PageViewOverrides};
pub use page::{PageContext, StaticPage};
pub use tracker::{Tracker, TrackerOptions};
