//! `carquote-api`: the estimator service.
//!
//! ```text
//! RUST_LOG=debug CARQUOTE_ADDR=127.0.0.1:8000 carquote-api
//! ```

use carquote::{Config, Server, api};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), carquote::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    Server::bind(config.addr).serve(api::router()).await
}
