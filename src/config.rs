//! Environment-driven configuration for the estimator service.

use std::env;
use std::net::SocketAddr;

use crate::error::Error;

/// Environment variable holding the service's listen address.
pub const ADDR_ENV: &str = "CARQUOTE_ADDR";

pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub addr: SocketAddr,
}

impl Config {
    /// Reads [`ADDR_ENV`], falling back to [`DEFAULT_ADDR`].
    pub fn from_env() -> Result<Self, Error> {
        let raw = env::var(ADDR_ENV).ok();
        Self::from_addr(raw.as_deref().unwrap_or(DEFAULT_ADDR))
    }

    pub fn from_addr(raw: &str) -> Result<Self, Error> {
        let addr = raw.trim().parse::<SocketAddr>().map_err(|source| Error::InvalidAddr {
            addr: raw.to_owned(),
            source,
        })?;
        Ok(Self { addr })
    }
}
