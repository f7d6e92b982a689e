//! # carquote
//!
//! A car price estimator: a small HTTP service that prices a car from a fixed
//! markup table, and a client that asks it for quotes.
//!
//! ## The rule
//!
//! | type (any case) | estimate |
//! |---|---|
//! | `sedan` | price + 5 000 |
//! | `suv` | price + 10 000 |
//! | anything else | price |
//!
//! See [`estimate_price`].
//!
//! ## The service
//!
//! Built on a deliberately small toolkit in this crate:
//!
//! - Radix-tree routing: O(path-length) lookup via [`matchit`]
//! - hyper for HTTP/1.1 and HTTP/2, tokio for I/O
//! - Graceful shutdown: SIGTERM / Ctrl-C, drains in-flight requests
//!
//! ```rust,no_run
//! use carquote::{Config, Server, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), carquote::Error> {
//!     let config = Config::from_env()?;
//!     Server::bind(config.addr).serve(api::router()).await
//! }
//! ```

mod error;
mod handler;
mod json;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod client;
pub mod config;
pub mod estimator;
pub mod health;
pub mod report;

pub use config::Config;
pub use error::Error;
pub use estimator::{CarQuote, estimate_price, markup_for};
pub use handler::Handler;
pub use json::{Json, JsonRejection};
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::{MAX_BODY_BYTES, Server};
pub use status::Status;
