use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub api_url: String,
    pub collect_url: String,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
    pub site_id: Option<String>,
    pub log_level: String,
    pub storage_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub watch_interval_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("collect_url", &self.collect_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[redacted]"))
            .field("site_id", &self.site_id)
            .field("log_level", &self.log_level)
            .field("storage_dir", &self.storage_dir)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("watch_interval_ms", &self.watch_interval_ms)
            .finish()
    }
}
