//! Navigation sampling.
//!
//! Route changes in single-page hosts fire no reliable hook, so the watcher
//! samples the page context on a short interval and reports each observed
//! change of path. The trade is explicit: detection latency is bounded by the
//! sampling interval, and in exchange the tracker needs nothing from the
//! host's navigation machinery.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::page::PageContext;

/// Handle to a running path watcher. Stopping is idempotent.
pub(crate) enum WatcherHandle {
    Task(tokio::task::JoinHandle<()>),
    Thread(Arc<AtomicBool>),
}

impl WatcherHandle {
    pub(crate) fn stop(&self) {
        match self {
            WatcherHandle::Task(task) => task.abort(),
            WatcherHandle::Thread(stop) => stop.store(true, Ordering::Relaxed),
        }
    }
}

/// Samples `page.current_path()` every `interval` and invokes `on_change` once
/// per observed change of value.
///
/// Edge-triggered: each sample is compared to the previous one only, so an
/// unchanged path emits nothing and a path revisited after leaving emits
/// again. The first sample is the path current at arm time, which the caller
/// has already reported.
pub(crate) fn spawn_path_watcher(
    page: Arc<dyn PageContext>,
    interval: Duration,
    on_change: impl Fn(String) + Send + Sync + 'static,
) -> WatcherHandle {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let task = handle.spawn(async move {
                let mut last = page.current_path();
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    ticker.tick().await;
                    let current = page.current_path();
                    if current != last {
                        last.clone_from(&current);
                        on_change(current);
                    }
                }
            });
            WatcherHandle::Task(task)
        }
        Err(_) => {
            let stop = Arc::new(AtomicBool::new(false));
            let observed = Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut last = page.current_path();
                while !observed.load(Ordering::Relaxed) {
                    std::thread::sleep(interval);
                    if observed.load(Ordering::Relaxed) {
                        break;
                    }
                    let current = page.current_path();
                    if current != last {
                        last.clone_from(&current);
                        on_change(current);
                    }
                }
            });
            WatcherHandle::Thread(stop)
        }
    }
}

#[cfg(test)]
#[path = "watcher_test.rs"]
mod tests;
