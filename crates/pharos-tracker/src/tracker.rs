use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::Url;

use crate::event::{PageView, PageViewOverrides};
use crate::identity;
use crate::page::PageContext;
use crate::transport::Delivery;
use crate::watcher::{spawn_path_watcher, WatcherHandle};

const DEFAULT_ENDPOINT: &str = "https://api.pharos.dev/api/track";
const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_millis(500);

/// Optional knobs for [`Tracker::init`]. `Default` gives production behavior.
#[derive(Debug, Clone, Default)]
pub struct TrackerOptions {
    /// Collector endpoint override. An unparseable URL is logged and the
    /// default endpoint is used instead.
    pub endpoint: Option<String>,
    /// User agent reported in event payloads and on the wire.
    pub user_agent: Option<String>,
    /// Directory holding the durable visitor id. Defaults to `~/.pharos`.
    pub storage_dir: Option<PathBuf>,
    /// Navigation sampling interval. Defaults to 500 ms.
    pub watch_interval: Option<Duration>,
}

/// Immutable per-instance configuration, assembled once by [`Tracker::init`].
struct TrackerConfig {
    api_key: String,
    endpoint: Url,
    user_agent: String,
    visitor_id: String,
}

struct TrackerInner {
    config: TrackerConfig,
    page: Arc<dyn PageContext>,
    delivery: Delivery,
    watcher: Mutex<Option<WatcherHandle>>,
}

/// Handle to one collector client instance.
///
/// Cloning is cheap; clones share the same identity, configuration, and
/// watcher. The watcher stops when [`Tracker::dispose`] is called or the last
/// clone is dropped. Reconfiguration is a fresh [`Tracker::init`]: each call
/// builds an independent instance and dropping the old one retires it.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<TrackerInner>,
}

impl Tracker {
    /// Starts a tracker: resolves the visitor identity, reports the current
    /// page once, and arms the navigation watcher.
    ///
    /// Never fails and never panics. An empty API key turns every event into
    /// a logged no-op; storage and transport faults degrade to logged
    /// best-effort behavior.
    pub fn init(api_key: impl Into<String>, page: impl PageContext, options: TrackerOptions) -> Self {
        let api_key = api_key.into();
        if api_key.is_empty() {
            tracing::warn!("no API key configured, events will not be sent");
        }

        let endpoint = resolve_endpoint(options.endpoint.as_deref());
        let user_agent = options.user_agent.unwrap_or_else(default_user_agent);

        let visitor_id = match options.storage_dir.or_else(default_storage_dir) {
            Some(dir) => identity::resolve_visitor_id(&dir),
            None => {
                tracing::warn!("no home directory available, using ephemeral visitor id");
                identity::generate_visitor_id()
            }
        };

        let delivery = Delivery::detect(&user_agent);
        let page: Arc<dyn PageContext> = Arc::new(page);

        let tracker = Tracker {
            inner: Arc::new(TrackerInner {
                config: TrackerConfig {
                    api_key,
                    endpoint,
                    user_agent,
                    visitor_id,
                },
                page: Arc::clone(&page),
                delivery,
                watcher: Mutex::new(None),
            }),
        };

        tracker.track(PageViewOverrides::default());

        let interval = options.watch_interval.unwrap_or(DEFAULT_WATCH_INTERVAL);
        // The watcher callback must not keep the tracker alive: a strong
        // reference here would cycle through the stored handle and the
        // watcher would survive the last external clone.
        let watch_inner = Arc::downgrade(&tracker.inner);
        let handle = spawn_path_watcher(page, interval, move |path| {
            if let Some(inner) = watch_inner.upgrade() {
                inner.send_event(PageViewOverrides {
                    path: Some(path),
                    referrer: None,
                });
            }
        });
        match tracker.inner.watcher.lock() {
            Ok(mut guard) => *guard = Some(handle),
            Err(poisoned) => *poisoned.into_inner() = Some(handle),
        }

        tracker
    }

    /// Records one page view. Missing override fields come from the page
    /// context; delivery faults never reach the caller.
    pub fn track(&self, overrides: PageViewOverrides) {
        self.inner.send_event(overrides);
    }

    /// The resolved visitor id for this instance.
    #[must_use]
    pub fn visitor_id(&self) -> &str {
        &self.inner.config.visitor_id
    }

    /// Stops the navigation watcher. Idempotent; in-flight deliveries are
    /// detached and unaffected.
    pub fn dispose(&self) {
        let handle = match self.inner.watcher.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.stop();
        }
    }
}

impl TrackerInner {
    fn send_event(&self, overrides: PageViewOverrides) {
        if self.config.api_key.is_empty() {
            tracing::warn!("track called without an API key, dropping event");
            return;
        }
        let event = PageView {
            path: overrides
                .path
                .unwrap_or_else(|| self.page.current_path()),
            referrer: overrides
                .referrer
                .unwrap_or_else(|| self.page.referrer()),
            user_agent: self.config.user_agent.clone(),
            visitor_id: self.config.visitor_id.clone(),
        };
        tracing::debug!(path = %event.path, "tracking page view");
        self.delivery
            .send(&self.config.endpoint, &self.config.api_key, &event);
    }
}

impl Drop for TrackerInner {
    fn drop(&mut self) {
        let handle = match self.watcher.get_mut() {
            Ok(guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.stop();
        }
    }
}

fn default_user_agent() -> String {
    format!("pharos-tracker/{}", env!("CARGO_PKG_VERSION"))
}

fn default_storage_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pharos"))
}

fn resolve_endpoint(override_url: Option<&str>) -> Url {
    if let Some(raw) = override_url {
        match Url::parse(raw) {
            Ok(url) => return url,
            Err(e) => {
                tracing::warn!(url = raw, error = %e, "invalid endpoint override, using default");
            }
        }
    }
    Url::parse(DEFAULT_ENDPOINT).expect("default collector endpoint is a valid URL")
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
