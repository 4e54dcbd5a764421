//! Event-sending command handler.

use std::time::Duration;

use pharos_core::AppConfig;
use pharos_tracker::{PageViewOverrides, StaticPage, Tracker, TrackerOptions};

/// Deliveries run on detached tasks; how long to let them drain before the
/// runtime shuts down under them.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Deliver `count` page-view events through the tracker, exactly as an
/// embedding host would: one event from `init`, the rest via `track`.
///
/// # Errors
///
/// Never fails on delivery — the SDK swallows transport faults. A missing
/// API key is a logged no-op, mirroring the SDK policy.
pub(crate) async fn run_send(
    config: &AppConfig,
    path: &str,
    referrer: &str,
    count: u32,
) -> anyhow::Result<()> {
    let Some(api_key) = config.api_key.as_deref() else {
        tracing::warn!("PHAROS_API_KEY is not set, no events will be sent");
        return Ok(());
    };

    let tracker = Tracker::init(
        api_key,
        StaticPage::with_referrer(path, referrer),
        TrackerOptions {
            endpoint: Some(config.collect_url.clone()),
            user_agent: Some(config.user_agent.clone()),
            storage_dir: Some(config.storage_dir.clone()),
            watch_interval: Some(Duration::from_millis(config.watch_interval_ms)),
        },
    );
    tracing::debug!(
        visitor_id = %tracker.visitor_id(),
        endpoint = %config.collect_url,
        "tracker initialized"
    );

    // `init` already reported the current page once.
    let count = count.max(1);
    for _ in 1..count {
        tracker.track(PageViewOverrides::default());
    }
    tracker.dispose();

    tokio::time::sleep(DRAIN_GRACE).await;

    println!(
        "sent {count} event(s) for {path} as visitor {}",
        tracker.visitor_id()
    );
    Ok(())
}
