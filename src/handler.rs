//! Handler trait and type erasure.
//!
//! # Why handlers are erased
//!
//! Every `async fn` has its own anonymous future type, and each handler may
//! return a different [`IntoResponse`] type: `welcome` yields `Json<Welcome>`,
//! `estimate` yields `Result<Json<f64>, JsonRejection>`, the probes yield a
//! plain [`Response`]. A matchit tree stores one value type per node, so the
//! router cannot hold these as they are. Each handler is therefore wrapped
//! once, at registration, into the same shape: a shared pointer to an object
//! whose `call` takes a [`Request`] and returns a boxed future of a finished
//! [`Response`]. The `IntoResponse` conversion happens inside that future, so
//! by the time the server sees the result every handler looks alike.
//!
//! ```text
//! async fn estimate(req: Request) -> impl IntoResponse   ← route handler
//!        ↓ router.post("/carPriceEstimator", estimate)
//! estimate.into_boxed_handler()                          ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(estimate))                          ← BoxedHandler
//!        ↓
//! handler.call(req)  at request time                     ← one vtable dispatch
//!        ↓
//! Box::pin(async { estimate(req).await.into_response() })
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// Pinned because hyper polls it in place; `Send + 'static` because the
/// connection task that awaits it may run on any runtime worker.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
///
/// Looking up a route clones this `Arc` (one atomic increment), so a handler
/// can be running on many connections at once without being copied.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Never implemented by hand. It is satisfied for any `async fn` with the
/// signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Bridges a concrete handler `F` to the trait-object world.
///
/// `FnHandler` is the only type that implements [`ErasedHandler`]; it keeps
/// `F` by value and calls it once per request.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
