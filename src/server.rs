//! HTTP server and graceful shutdown.
//!
//! On **SIGTERM** (or Ctrl-C) the server:
//! 1. Immediately stops `listener.accept()`, so no new connections are made.
//! 2. Asks every open connection to finish its in-flight request and close.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.
//!
//! Tests and embedders that want to stop the server themselves use
//! [`Server::serve_with_shutdown`] with any future.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::{Lookup, Router};
use crate::status::Status;

enum Listen {
    Addr(SocketAddr),
    Bound(TcpListener),
}

/// The HTTP server.
pub struct Server {
    listen: Listen,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// ```rust,no_run
    /// use carquote::Server;
    /// let server = Server::bind(([0, 0, 0, 0], 8000).into());
    /// ```
    pub fn bind(addr: SocketAddr) -> Self {
        Self { listen: Listen::Addr(addr) }
    }

    /// Serves on an already-bound listener, e.g. one bound to port `0`.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listen: Listen::Bound(listener) }
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`serve`](Server::serve), but drains and returns once `signal`
    /// resolves instead of waiting for a process signal.
    pub async fn serve_with_shutdown<S>(self, router: Router, signal: S) -> Result<(), Error>
    where
        S: Future<Output = ()> + Send,
    {
        let listener = match self.listen {
            Listen::Addr(addr) => TcpListener::bind(addr).await?,
            Listen::Bound(listener) => listener,
        };
        let router = Arc::new(router);

        info!(addr = %listener.local_addr()?, "carquote listening");

        let mut tasks = tokio::task::JoinSet::new();
        let (draining_tx, draining_rx) = watch::channel(false);

        let shutdown = signal;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Shutdown is checked first so a signal stops accepting
                // immediately, even if more connections are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    let mut draining = draining_rx.clone();

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req).await }
                        });

                        let builder = ConnBuilder::new(TokioExecutor::new());
                        let conn = builder.serve_connection(io, svc);
                        tokio::pin!(conn);

                        // Idle keep-alive connections would otherwise hold the
                        // drain open until the client hangs up.
                        let res = tokio::select! {
                            res = conn.as_mut() => res,
                            _ = draining.changed() => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };

                        if let Err(e) = res {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        let _ = draining_tx.send(true);
        while tasks.join_next().await.is_some() {}

        info!("carquote stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Largest request body the server will buffer. A car quote is a few hundred
/// bytes; anything past this answers `413 Content Too Large`.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Routes one request and produces one response.
///
/// Every failure becomes an HTTP status, so hyper never sees an error.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();

    let response = respond(&router, &parts, body).await;

    debug!(
        method = %parts.method,
        path = parts.uri.path(),
        status = response.status_code(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "request handled"
    );

    Ok(response.into_inner())
}

/// Resolves the route from the request head first. The body is only read
/// once a handler has matched, so 404 and 405 answers never touch it.
async fn respond<B>(router: &Router, parts: &http::request::Parts, body: B) -> Response
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = parts.uri.path();
    let Ok(method) = parts.method.as_str().parse::<Method>() else {
        // Unknown methods can never match, so only the path decides 404 vs 405.
        return Lookup::miss_response(&router.allowed_methods(path));
    };

    match router.lookup(method, path) {
        Lookup::Found(handler, params) => match read_body(body).await {
            Ok(bytes) => {
                let req = Request::from_parts(method, parts, bytes).with_params(params);
                handler.call(req).await
            }
            Err(res) => res,
        },
        Lookup::MethodNotAllowed(allowed) => Lookup::miss_response(&allowed),
        Lookup::NotFound => Lookup::miss_response(&[]),
    }
}

/// Buffers at most [`MAX_BODY_BYTES`] of `body`.
async fn read_body<B>(body: B) -> Result<Bytes, Response>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            debug!(limit = MAX_BODY_BYTES, "request body too large");
            Err(Response::status(Status::ContentTooLarge))
        }
        Err(e) => {
            debug!("failed to read request body: {e}");
            Err(Response::status(Status::BadRequest))
        }
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** and **SIGINT** (Ctrl-C).
/// On Windows only Ctrl-C is available. If a handler cannot be installed the
/// corresponding arm never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use hyper::body::Frame;

    use super::*;
    use crate::api;

    /// A body that fails as soon as anyone polls it.
    struct Unreadable;

    impl Body for Unreadable {
        type Data = Bytes;
        type Error = std::io::Error;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
            Poll::Ready(Some(Err(std::io::Error::other("body was read"))))
        }
    }

    fn head(method: &str, path: &str) -> http::request::Parts {
        let (parts, ()) = http::Request::builder()
            .method(method)
            .uri(path)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn unknown_path_answers_without_reading_the_body() {
        let res = respond(&api::router(), &head("POST", "/nope"), Unreadable).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn wrong_method_answers_without_reading_the_body() {
        let res = respond(&api::router(), &head("PUT", api::ESTIMATE_PATH), Unreadable).await;
        assert_eq!(res.status_code(), 405);
        assert_eq!(res.header("allow"), Some("POST"));
    }

    #[tokio::test]
    async fn unregistered_method_on_known_path_is_405() {
        let res = respond(&api::router(), &head("PROPFIND", api::ESTIMATE_PATH), Unreadable).await;
        assert_eq!(res.status_code(), 405);
    }

    #[tokio::test]
    async fn matched_route_reads_the_body() {
        let res = respond(&api::router(), &head("POST", api::ESTIMATE_PATH), Unreadable).await;
        assert_eq!(res.status_code(), 400);
    }

    #[tokio::test]
    async fn body_over_the_limit_is_413() {
        let body = Full::new(Bytes::from(vec![b' '; MAX_BODY_BYTES + 1]));
        let res = respond(&api::router(), &head("POST", api::ESTIMATE_PATH), body).await;
        assert_eq!(res.status_code(), 413);
    }

    #[tokio::test]
    async fn body_at_the_limit_is_read() {
        let quote = br#"{"name":"Civic","type":"sedan","price":1,"description":"x"}"#;
        let mut padded = vec![b' '; MAX_BODY_BYTES - quote.len()];
        padded.extend_from_slice(quote);

        let body = Full::new(Bytes::from(padded));
        let res = respond(&api::router(), &head("POST", api::ESTIMATE_PATH), body).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"5001.0");
    }
}
