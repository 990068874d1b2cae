//! Incoming HTTP request type.

use crate::method::Method;

/// An incoming HTTP request, reduced to what routing needs.
///
/// No route reads headers or a body, so the server never collects them: a
/// large upload to `/api/stats` is answered `405` without being buffered.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
}

impl Request {
    /// The server uses this for every inbound request; tests use it to drive
    /// a [`Router`](crate::Router) without a socket.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into() }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
}
