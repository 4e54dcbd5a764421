//! Live dashboard read models.
//!
//! `pharos-stats` keeps a selected site's statistics fresh on the dashboard
//! side: [`StatsClient`] speaks to the query API, [`StatsPoller`] re-fetches
//! the realtime and overview models on a fixed cadence and publishes atomic
//! snapshots, and minute labels are converted from server UTC into the
//! viewer's clock domain before display.

pub mod client;
pub mod error;
pub mod normalize;
pub mod poller;
pub mod types;

pub use client::StatsClient;
pub use error::StatsError;
pub use normalize::localize_minutes;
pub use poller::StatsPoller;
pub use types::{
    LiveSnapshot, MinuteBucket, OverviewStats, PageCount, RealtimeStats, ReferrerCount, Site,
};
