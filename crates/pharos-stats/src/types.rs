use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A site registered with the query API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub domain: String,
}

/// One minute of traffic in the realtime window.
///
/// `minute` is wall-clock "HH:MM" in the clock domain of whoever produced
/// the value: UTC on the wire, viewer-local after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinuteBucket {
    pub minute: String,
    pub hits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount {
    pub path: String,
    pub hits: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferrerCount {
    pub referrer: String,
    pub hits: u64,
}

/// Live traffic read model for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeStats {
    pub active_visitors: u64,
    /// Ordered trailing window, typically one entry per minute.
    #[serde(default)]
    pub hits_per_minute: Vec<MinuteBucket>,
    /// Ranked descending by hits.
    #[serde(default)]
    pub top_pages: Vec<PageCount>,
    /// Ranked descending by hits.
    #[serde(default)]
    pub top_referrers: Vec<ReferrerCount>,
    #[serde(default)]
    pub devices: BTreeMap<String, u64>,
    #[serde(default)]
    pub browsers: BTreeMap<String, u64>,
    #[serde(default)]
    pub countries: BTreeMap<String, u64>,
}

/// Long-window aggregate read model for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStats {
    pub total_hits: u64,
    pub unique_visitors: u64,
    /// Percentage in `[0, 100]`.
    pub bounce_rate: f64,
}

/// Envelope every query-API response wraps its payload in.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

/// Latest polled state for the selected site.
///
/// Published as one value per applied cycle; a consumer never observes a
/// half-applied cycle. A model that failed to fetch keeps its previous value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LiveSnapshot {
    pub site_id: String,
    /// Minute labels already converted to the viewer's clock domain.
    pub realtime: Option<RealtimeStats>,
    pub overview: Option<OverviewStats>,
    /// When the last cycle that applied anything settled.
    pub last_update: Option<DateTime<Utc>>,
    /// Most recent cycle failure; cleared by the next fully successful cycle.
    pub last_error: Option<String>,
}
