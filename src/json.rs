//! JSON bodies in and out.
//!
//! [`Json<T>`] serializes a value as a `200 OK` `application/json` response.
//! [`JsonRejection`] is what [`Request::json`](crate::Request::json) returns
//! when a body does not match the expected shape; it renders as
//! `422 Unprocessable Content` with `{"detail": "<reason>"}`.

use serde::Serialize;
use tracing::error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// A value rendered as a JSON response body.
///
/// ```rust
/// use carquote::{IntoResponse, Json};
///
/// let res = Json(25_000.0_f64).into_response();
/// assert_eq!(res.body(), b"25000.0");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("failed to serialize response body: {e}");
                Response::status(Status::InternalServerError)
            }
        }
    }
}

/// A request body that failed schema validation.
#[derive(Debug)]
pub struct JsonRejection {
    message: String,
}

impl JsonRejection {
    /// The deserializer's description of what was wrong.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for JsonRejection {
    fn from(e: serde_json::Error) -> Self {
        Self { message: e.to_string() }
    }
}

#[derive(Serialize)]
struct Detail<'a> {
    detail: &'a str,
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let body = serde_json::to_vec(&Detail { detail: &self.message })
            .unwrap_or_else(|_| br#"{"detail":"invalid request body"}"#.to_vec());
        Response::builder()
            .status(Status::UnprocessableContent)
            .json(body)
    }
}
