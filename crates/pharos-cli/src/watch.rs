//! Live-stats watch command handler.

use std::time::Duration;

use pharos_core::AppConfig;
use pharos_stats::{LiveSnapshot, StatsClient, StatsPoller};

/// Poll live stats for one site and print every applied snapshot until
/// ctrl-c.
///
/// The site comes from `--site`, else `PHAROS_SITE_ID`, else the first site
/// the query API lists — the same default the dashboard applies.
///
/// # Errors
///
/// Returns an error for an unknown format, a client that cannot be built,
/// or when no site can be resolved. Polling failures after that are the
/// poller's business: logged, surfaced as `last_error`, never fatal.
pub(crate) async fn run_watch(
    config: &AppConfig,
    site: Option<&str>,
    format: &str,
) -> anyhow::Result<()> {
    if format != "json" && format != "text" {
        anyhow::bail!("unknown format '{format}' (expected 'json' or 'text')");
    }

    let client = StatsClient::new(
        &config.api_url,
        config.auth_token.clone(),
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let site_id = match (site, &config.site_id) {
        (Some(id), _) => id.to_string(),
        (None, Some(id)) => id.clone(),
        (None, None) => {
            let sites = client.list_sites().await?;
            let first = sites.into_iter().next().ok_or_else(|| {
                anyhow::anyhow!("no sites registered; add one in the dashboard first")
            })?;
            tracing::info!(
                site = %first.id,
                domain = %first.domain,
                "no site configured, watching the first one"
            );
            first.id
        }
    };

    let poller =
        StatsPoller::with_poll_interval(client, Duration::from_millis(config.poll_interval_ms));
    let mut rx = poller.subscribe();
    poller.select_site(&site_id);
    tracing::info!(
        site = %site_id,
        interval_ms = config.poll_interval_ms,
        "watching live stats, ctrl-c to stop"
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                print_snapshot(&snapshot, format)?;
            }
            _ = &mut ctrl_c => {
                tracing::info!("received ctrl-c, stopping watch");
                break;
            }
        }
    }

    poller.dispose();
    Ok(())
}

/// One line per applied snapshot: raw JSON, or a short text summary.
fn print_snapshot(snapshot: &LiveSnapshot, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string(snapshot)?);
        return Ok(());
    }

    let stamp = snapshot.last_update.map_or_else(
        || "--:--:--".to_string(),
        |t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
    );
    let active = snapshot.realtime.as_ref().map_or(0, |r| r.active_visitors);
    let (total, unique, bounce) = snapshot
        .overview
        .as_ref()
        .map_or((0, 0, 0.0), |o| (o.total_hits, o.unique_visitors, o.bounce_rate));

    let mut line = format!(
        "{stamp}  {}  active {active} | hits {total} | unique {unique} | bounce {bounce:.1}%",
        snapshot.site_id
    );
    if let Some(error) = &snapshot.last_error {
        line.push_str(&format!("  [stale: {error}]"));
    }
    println!("{line}");
    Ok(())
}
