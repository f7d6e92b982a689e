//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::json::JsonRejection;
use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        headers: Vec<(String, String)>,
        body: Bytes,
    ) -> Self {
        Self { method, path: path.into(), headers, body, params: HashMap::new() }
    }

    /// Converts hyper's request head plus the collected body.
    ///
    /// Header values that are not visible ASCII are dropped.
    pub(crate) fn from_parts(method: Method, parts: &http::request::Parts, body: Bytes) -> Self {
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        Self::new(method, parts.uri.path(), headers, body)
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/cars/{id}`, `req.param("id")` on `/cars/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Deserializes the body as JSON.
    ///
    /// Any failure (malformed JSON, a missing field, a field of the wrong
    /// type) becomes a [`JsonRejection`], which answers `422`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, JsonRejection> {
        serde_json::from_slice(&self.body).map_err(JsonRejection::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(
            Method::Get,
            "/",
            vec![("Content-Type".to_owned(), "application/json".to_owned())],
            Bytes::new(),
        );
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn json_reports_missing_fields() {
        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct Probe {
            price: f64,
        }

        let req = Request::new(Method::Post, "/", Vec::new(), Bytes::from_static(b"{}"));
        let err = req.json::<Probe>().err().expect("missing field must be rejected");
        assert!(err.message().contains("missing field `price`"));
    }
}
