use serde::Serialize;

/// One page-view occurrence, serialized verbatim as the collector wire format.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub path: String,
    /// Empty string means direct traffic.
    pub referrer: String,
    pub user_agent: String,
    pub visitor_id: String,
}

/// Caller-supplied overrides for one [`Tracker::track`](crate::Tracker::track)
/// call. Fields left `None` fall back to the live page context.
#[derive(Debug, Clone, Default)]
pub struct PageViewOverrides {
    pub path: Option<String>,
    pub referrer: Option<String>,
}
