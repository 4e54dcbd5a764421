//! Best-effort event delivery.
//!
//! Two mechanisms, picked once when the tracker is built:
//!
//! 1. Out-of-band: with an ambient tokio runtime available, each event is
//!    POSTed from a detached task. The caller never waits and the send
//!    outlives the tracker handle that produced it. This path sets no custom
//!    headers; the API key rides in the endpoint URL.
//! 2. Keep-alive fallback: without a runtime, a blocking client with TCP
//!    keep-alive sends the event from a detached thread, with the API key in
//!    the `X-API-Key` header.
//!
//! Both are at-most-once. A failed send is logged and the event is dropped;
//! there is no retry and no queue.

use std::time::Duration;

use reqwest::Url;

use crate::event::PageView;

const API_KEY_HEADER: &str = "X-API-Key";
const API_KEY_PARAM: &str = "key";
const SEND_TIMEOUT_SECS: u64 = 10;

pub(crate) enum Delivery {
    /// Detached tokio task per event on the ambient runtime.
    OutOfBand {
        handle: tokio::runtime::Handle,
        client: reqwest::Client,
    },
    /// Detached plain thread per event.
    KeepAlive { client: reqwest::blocking::Client },
    /// Client construction failed; events are dropped.
    Disabled,
}

impl Delivery {
    /// Picks the delivery mechanism for the current environment.
    pub(crate) fn detect(user_agent: &str) -> Self {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let built = reqwest::Client::builder()
                    .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
                    .connect_timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
                    .user_agent(user_agent)
                    .build();
                match built {
                    Ok(client) => Delivery::OutOfBand { handle, client },
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to build HTTP client, event delivery disabled");
                        Delivery::Disabled
                    }
                }
            }
            Err(_) => {
                let built = reqwest::blocking::Client::builder()
                    .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
                    .connect_timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
                    .tcp_keepalive(Duration::from_secs(60))
                    .user_agent(user_agent)
                    .build();
                match built {
                    Ok(client) => Delivery::KeepAlive { client },
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to build HTTP client, event delivery disabled");
                        Delivery::Disabled
                    }
                }
            }
        }
    }

    /// Hands one event to the wire and returns immediately.
    pub(crate) fn send(&self, endpoint: &Url, api_key: &str, event: &PageView) {
        match self {
            Delivery::OutOfBand { handle, client } => {
                let client = client.clone();
                let mut url = endpoint.clone();
                url.query_pairs_mut().append_pair(API_KEY_PARAM, api_key);
                let event = event.clone();
                handle.spawn(async move {
                    match client.post(url).json(&event).send().await {
                        Ok(response) if !response.status().is_success() => {
                            tracing::debug!(
                                status = response.status().as_u16(),
                                path = %event.path,
                                "collector rejected event"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::debug!(error = %e, path = %event.path, "event delivery failed");
                        }
                    }
                });
            }
            Delivery::KeepAlive { client } => {
                let client = client.clone();
                let url = endpoint.clone();
                let api_key = api_key.to_owned();
                let event = event.clone();
                std::thread::spawn(move || {
                    let sent = client
                        .post(url)
                        .header(API_KEY_HEADER, api_key)
                        .json(&event)
                        .send();
                    match sent {
                        Ok(response) if !response.status().is_success() => {
                            tracing::debug!(
                                status = response.status().as_u16(),
                                path = %event.path,
                                "collector rejected event"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::debug!(error = %e, path = %event.path, "event delivery failed");
                        }
                    }
                });
            }
            Delivery::Disabled => {
                tracing::debug!(path = %event.path, "event delivery disabled, dropping event");
            }
        }
    }
}
