//! HTTP client for the Pharos query API.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::StatsError;
use crate::types::{Envelope, OverviewStats, RealtimeStats, Site};

/// HTTP client for the Pharos query API.
///
/// Wraps `reqwest` with the crate's timeout and auth conventions and unwraps
/// the `{ "data": ... }` envelope every endpoint responds with. Non-2xx
/// statuses come back as typed errors; retry policy belongs to callers, and
/// the poller deliberately has none.
pub struct StatsClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl StatsClient {
    /// Creates a `StatsClient` for the query API at `base_url`.
    ///
    /// `auth_token`, when present, is attached to every request as a bearer
    /// token.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        auth_token: Option<String>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StatsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    /// Lists the sites visible to the configured token.
    ///
    /// # Errors
    ///
    /// - [`StatsError::NotFound`] — HTTP 404.
    /// - [`StatsError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`StatsError::Http`] — network or TLS failure.
    /// - [`StatsError::Deserialize`] — response body is not the expected JSON.
    pub async fn list_sites(&self) -> Result<Vec<Site>, StatsError> {
        self.get_enveloped("/api/sites").await
    }

    /// Fetches the realtime read model for `site_id`. Minute buckets are in
    /// the server's UTC clock domain; see
    /// [`localize_minutes`](crate::normalize::localize_minutes).
    ///
    /// # Errors
    ///
    /// Same as [`StatsClient::list_sites`].
    pub async fn realtime_stats(&self, site_id: &str) -> Result<RealtimeStats, StatsError> {
        self.get_enveloped(&format!("/api/sites/{site_id}/stats/realtime"))
            .await
    }

    /// Fetches the overview read model for `site_id`.
    ///
    /// # Errors
    ///
    /// Same as [`StatsClient::list_sites`].
    pub async fn overview_stats(&self, site_id: &str) -> Result<OverviewStats, StatsError> {
        self.get_enveloped(&format!("/api/sites/{site_id}/stats/overview"))
            .await
    }

    async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<T, StatsError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StatsError::NotFound { url });
        }

        if !status.is_success() {
            return Err(StatsError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let envelope =
            serde_json::from_str::<Envelope<T>>(&body).map_err(|e| StatsError::Deserialize {
                context: format!("response from {url}"),
                source: e,
            })?;
        Ok(envelope.data)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
