//! Polling session over the stats client.
//!
//! One [`StatsPoller`] keeps the read models for a single selected site
//! fresh: an immediate fetch on selection, then a fixed cadence. Each cycle
//! fetches realtime and overview concurrently and applies exactly one
//! snapshot swap when both settle. Cycles land in start order: a slow one
//! overtaken by a newer one is discarded, as is anything in flight across a
//! site switch. A failing fetch keeps the previous value for that model; a
//! failing cycle never stops the timer. The poller degrades to stale, not
//! broken.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::StatsClient;
use crate::normalize::localize_minutes;
use crate::types::{LiveSnapshot, RealtimeStats};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

struct PollerInner {
    client: StatsClient,
    poll_interval: Duration,
    /// Fixed viewer offset for minute localization; `None` means the system
    /// local zone.
    viewer_offset: Mutex<Option<FixedOffset>>,
    /// Bumped on every site switch and on dispose. A cycle applies only if
    /// the generation it was started under is still current, so a cycle for
    /// a superseded selection can never land.
    generation: AtomicU64,
    /// Monotonic cycle token source; every cycle draws one before fetching.
    cycle: AtomicU64,
    /// Highest cycle token applied so far. The swap claims it with a
    /// `fetch_max` and rejects tokens at or below it, so a slow cycle
    /// settling late can never overwrite a newer cycle's data.
    applied: AtomicU64,
    site: Mutex<Option<String>>,
    task: Mutex<Option<JoinHandle<()>>>,
    tx: watch::Sender<LiveSnapshot>,
}

/// Polling session for the live dashboard.
///
/// Clones share one session. `select_site`, `refresh`, and `dispose` must be
/// called within a tokio runtime.
#[derive(Clone)]
pub struct StatsPoller {
    inner: Arc<PollerInner>,
}

impl StatsPoller {
    /// Creates a poller on the default 5-second cadence.
    #[must_use]
    pub fn new(client: StatsClient) -> Self {
        Self::with_poll_interval(client, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a poller with a custom cadence.
    #[must_use]
    pub fn with_poll_interval(client: StatsClient, poll_interval: Duration) -> Self {
        let (tx, _rx) = watch::channel(LiveSnapshot::default());
        Self {
            inner: Arc::new(PollerInner {
                client,
                poll_interval,
                viewer_offset: Mutex::new(None),
                generation: AtomicU64::new(0),
                cycle: AtomicU64::new(0),
                applied: AtomicU64::new(0),
                site: Mutex::new(None),
                task: Mutex::new(None),
                tx,
            }),
        }
    }

    /// Pins minute localization to a fixed UTC offset instead of the system
    /// local zone. Takes effect from the next applied cycle.
    pub fn set_viewer_offset(&self, offset: FixedOffset) {
        *lock(&self.inner.viewer_offset) = Some(offset);
    }

    /// Observes snapshot swaps. The channel always holds the latest snapshot,
    /// so a late subscriber sees current state immediately.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LiveSnapshot> {
        self.inner.tx.subscribe()
    }

    /// Switches polling to `site_id`.
    ///
    /// The previous site's timer stops and results of its in-flight cycles
    /// are discarded. For a non-empty id a fetch fires immediately and the
    /// cadence continues from there; an empty id suspends polling entirely,
    /// leaving the last published snapshot in place.
    pub fn select_site(&self, site_id: &str) {
        // Invalidate in-flight cycles before anything else can observe them.
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // The slot stays locked from abort to replace so concurrent calls
        // cannot race each other into two live tasks.
        let mut task_slot = lock(&self.inner.task);
        if let Some(task) = task_slot.take() {
            task.abort();
        }

        if site_id.is_empty() {
            lock(&self.inner.site).take();
            tracing::debug!("site selection cleared, polling suspended");
            return;
        }

        *lock(&self.inner.site) = Some(site_id.to_string());

        // The task must not keep the poller alive: a strong reference here
        // would cycle through the stored handle and polling would survive
        // the last external clone.
        let poll_interval = self.inner.poll_interval;
        let inner = Arc::downgrade(&self.inner);
        let site = site_id.to_string();
        *task_slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = inner.upgrade() else { return };
                inner.run_cycle(&site, generation).await;
            }
        }));
        tracing::debug!(site = %site_id, "site selected, polling started");
    }

    /// Runs one cycle for the selected site right now, outside the timer.
    /// No-op when polling is suspended. The usual application rules apply:
    /// the result is discarded if the site changes while the fetches are in
    /// flight or if a newer cycle lands first.
    pub async fn refresh(&self) {
        // Generation before site: a switch landing between these two reads
        // must invalidate the cycle, not relabel it with the new selection.
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let selected = lock(&self.inner.site).clone();
        let Some(site) = selected else {
            tracing::debug!("refresh without a selected site, nothing to do");
            return;
        };
        self.inner.run_cycle(&site, generation).await;
    }

    /// Stops polling. The last published snapshot stays readable through
    /// existing receivers. Also performed when the last clone is dropped.
    pub fn dispose(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = lock(&self.inner.task).take() {
            task.abort();
        }
        lock(&self.inner.site).take();
    }
}

impl PollerInner {
    async fn run_cycle(&self, site_id: &str, generation: u64) {
        // Drawn before the fetches so tokens order cycles by start time.
        let token = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let (realtime, overview) = tokio::join!(
            self.client.realtime_stats(site_id),
            self.client.overview_stats(site_id)
        );

        let viewer_offset = *lock(&self.viewer_offset);
        let localized = realtime.map(|stats| {
            let hits_per_minute = match viewer_offset {
                Some(offset) => localize_minutes(&stats.hits_per_minute, &offset),
                None => localize_minutes(&stats.hits_per_minute, &chrono::Local),
            };
            RealtimeStats {
                hits_per_minute,
                ..stats
            }
        });
        let now = Utc::now();
        let site = site_id.to_string();

        // One swap per cycle; both gates live inside the swap so neither a
        // site switch nor a competing cycle can interleave between check and
        // apply. The generation rejects cycles of a superseded selection,
        // the token claim rejects cycles overtaken by a newer one.
        self.tx.send_if_modified(move |snapshot| {
            if self.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(site = %site, "discarding stale poll cycle");
                return false;
            }
            if self.applied.fetch_max(token, Ordering::SeqCst) >= token {
                tracing::debug!(site = %site, "discarding cycle overtaken by a newer one");
                return false;
            }

            let mut landed = false;
            let mut failures: Vec<String> = Vec::new();

            match localized {
                Ok(stats) => {
                    snapshot.realtime = Some(stats);
                    landed = true;
                }
                Err(e) => {
                    tracing::warn!(site = %site, error = %e, "realtime stats fetch failed");
                    failures.push(format!("realtime: {e}"));
                }
            }

            match overview {
                Ok(stats) => {
                    snapshot.overview = Some(stats);
                    landed = true;
                }
                Err(e) => {
                    tracing::warn!(site = %site, error = %e, "overview stats fetch failed");
                    failures.push(format!("overview: {e}"));
                }
            }

            snapshot.site_id = site;
            snapshot.last_error = if failures.is_empty() {
                None
            } else {
                Some(failures.join("; "))
            };
            if landed {
                snapshot.last_update = Some(now);
            }
            true
        });
    }
}

impl Drop for PollerInner {
    fn drop(&mut self) {
        let task = match self.task.get_mut() {
            Ok(guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(task) = task {
            task.abort();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
