use std::sync::{Arc, RwLock};

/// Where the host's notion of "current page" comes from.
///
/// A browser embedding reads these from the location bar; server-side or
/// desktop hosts supply whatever navigation concept they have. Implementations
/// are polled from the navigation watcher, so they must be cheap to call.
pub trait PageContext: Send + Sync + 'static {
    /// Path of the page the visitor is currently on.
    fn current_path(&self) -> String;

    /// Referrer of the current page. Empty string means direct traffic.
    fn referrer(&self) -> String {
        String::new()
    }
}

/// A page context with a fixed referrer and a swappable path.
///
/// Clones share the same underlying path, so a host can keep one clone to
/// report navigation while the tracker polls another.
#[derive(Clone)]
pub struct StaticPage {
    path: Arc<RwLock<String>>,
    referrer: String,
}

impl StaticPage {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Arc::new(RwLock::new(path.into())),
            referrer: String::new(),
        }
    }

    #[must_use]
    pub fn with_referrer(path: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self {
            path: Arc::new(RwLock::new(path.into())),
            referrer: referrer.into(),
        }
    }

    /// Replaces the current path; the watcher picks the change up on its next
    /// sample.
    pub fn set_path(&self, path: impl Into<String>) {
        let path = path.into();
        match self.path.write() {
            Ok(mut guard) => *guard = path,
            Err(poisoned) => *poisoned.into_inner() = path,
        }
    }
}

impl PageContext for StaticPage {
    fn current_path(&self) -> String {
        match self.path.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn referrer(&self) -> String {
        self.referrer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_page_clones_share_the_path() {
        let page = StaticPage::new("/home");
        let other = page.clone();
        other.set_path("/pricing");
        assert_eq!(page.current_path(), "/pricing");
    }

    #[test]
    fn static_page_referrer_defaults_to_direct() {
        let page = StaticPage::new("/home");
        assert_eq!(page.referrer(), "");

        let referred = StaticPage::with_referrer("/home", "https://example.com");
        assert_eq!(referred.referrer(), "https://example.com");
    }
}
