//! HTTP client for the estimator service.
//!
//! Used by the `carquote` command, and usable on its own:
//!
//! ```rust,no_run
//! use carquote::client::EstimatorClient;
//! use carquote::CarQuote;
//!
//! # async fn run() -> Result<(), carquote::client::ClientError> {
//! let client = EstimatorClient::new("http://localhost:8000");
//! let estimate = client.estimate(&CarQuote {
//!     name: "Civic".into(),
//!     kind: "sedan".into(),
//!     price: 20_000.0,
//!     description: "No description provided".into(),
//! }).await?;
//! assert_eq!(estimate, 25_000.0);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::api::{ESTIMATE_PATH, Welcome};
use crate::estimator::CarQuote;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The service could not be reached at all.
    #[error("cannot connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status. `body` is verbatim.
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    fn from_send(url: &str, e: reqwest::Error) -> Self {
        if e.is_connect() {
            Self::Connect { url: url.to_owned(), source: e }
        } else {
            Self::Transport(e)
        }
    }
}

/// Talks to one estimator service.
#[derive(Debug, Clone)]
pub struct EstimatorClient {
    base_url: String,
    http: reqwest::Client,
}

impl EstimatorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, http: reqwest::Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes the service root and returns its welcome message.
    pub async fn welcome(&self) -> Result<String, ClientError> {
        let url = format!("{}/", self.base_url);
        let res = self.http.get(&url).send().await
            .map_err(|e| ClientError::from_send(&url, e))?;
        let welcome: Welcome = ensure_success(res).await?
            .json().await
            .map_err(ClientError::Decode)?;
        Ok(welcome.message)
    }

    /// Asks the service to price `car`.
    pub async fn estimate(&self, car: &CarQuote) -> Result<f64, ClientError> {
        let url = format!("{}{ESTIMATE_PATH}", self.base_url);
        let res = self.http.post(&url).json(car).send().await
            .map_err(|e| ClientError::from_send(&url, e))?;
        ensure_success(res).await?
            .json::<f64>().await
            .map_err(ClientError::Decode)
    }
}

async fn ensure_success(res: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read response body>".to_owned());
    Err(ClientError::Status { status: status.as_u16(), body })
}
