//! History fetch seam.
//!
//! The session only ever sees `HistoryLoaded` or `HistoryFailed`
//! events; this module defines the trait a driver calls to produce
//! them, plus the production HTTP implementation behind the
//! `transport` feature.

use async_trait::async_trait;
use hopeconnect_core::UserId;
use thiserror::Error;

use crate::wire::WireMessage;

/// Failure to load the prior message log.
///
/// Always recoverable: the driver maps any variant to
/// [`SessionEvent::HistoryFailed`](crate::SessionEvent::HistoryFailed)
/// and the conversation starts empty.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The request never produced a usable response.
    #[error("history request failed: {0}")]
    Request(String),

    /// The server answered outside the 2xx range.
    #[error("history request rejected with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body was not the expected JSON array of message records.
    #[error("malformed history response: {0}")]
    Malformed(String),
}

/// Read access to the prior message log for a conversation pair.
#[async_trait]
pub trait HistoryApi: Send + Sync {
    /// Fetch all prior messages between `self_id` and `other_id`,
    /// in server order.
    async fn fetch(
        &self,
        self_id: &UserId,
        other_id: &UserId,
    ) -> Result<Vec<WireMessage>, HistoryError>;
}

#[cfg(feature = "transport")]
pub use http::HttpHistoryApi;

#[cfg(feature = "transport")]
mod http {
    use async_trait::async_trait;
    use hopeconnect_core::UserId;

    use super::{HistoryApi, HistoryError};
    use crate::wire::WireMessage;

    /// History fetch over the backend's REST endpoint
    /// (`GET {base}/chat/{self}/{other}`).
    pub struct HttpHistoryApi {
        client: reqwest::Client,
        base_url: String,
        auth_token: String,
    }

    impl HttpHistoryApi {
        /// Create a client for the given API base URL and bearer token.
        /// A trailing slash on the base URL is tolerated.
        pub fn new(base_url: impl Into<String>, auth_token: impl Into<String>) -> Self {
            let mut base_url = base_url.into();
            while base_url.ends_with('/') {
                base_url.pop();
            }
            Self { client: reqwest::Client::new(), base_url, auth_token: auth_token.into() }
        }
    }

    #[async_trait]
    impl HistoryApi for HttpHistoryApi {
        async fn fetch(
            &self,
            self_id: &UserId,
            other_id: &UserId,
        ) -> Result<Vec<WireMessage>, HistoryError> {
            let url =
                format!("{}/chat/{}/{}", self.base_url, self_id.as_str(), other_id.as_str());
            tracing::debug!(%url, "fetching conversation history");

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.auth_token)
                .send()
                .await
                .map_err(|e| HistoryError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(HistoryError::Status { status: status.as_u16() });
            }

            response
                .json::<Vec<WireMessage>>()
                .await
                .map_err(|e| HistoryError::Malformed(e.to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::HistoryError;

    #[test]
    fn errors_render_for_the_log() {
        let err = HistoryError::Status { status: 503 };
        assert_eq!(err.to_string(), "history request rejected with status 503");
    }
}
