use thiserror::Error;

/// Errors returned by the stats API client.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered 404, usually an unknown site id.
    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    /// The API answered with a non-2xx status other than 404.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}
