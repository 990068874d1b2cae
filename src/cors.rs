//! CORS header table.
//!
//! The same header set goes on every response, and is the whole answer to a
//! browser preflight (`OPTIONS`). There is no per-origin logic: the service
//! sits behind a single frontend and the origin is configured, not negotiated.

use serde::Deserialize;

use crate::response::Response;
use crate::status::Status;

/// Configured CORS headers.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CorsPolicy {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    /// Preflight cache lifetime in seconds.
    pub max_age: u32,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_owned(),
            allow_methods: "GET, OPTIONS".to_owned(),
            allow_headers: "Content-Type, Authorization".to_owned(),
            max_age: 86_400,
        }
    }
}

impl CorsPolicy {
    /// Attaches the header set to `res`, replacing any header of the same name.
    pub fn apply(&self, res: &mut Response) {
        let max_age = self.max_age.to_string();
        res.merge_headers([
            ("access-control-allow-origin", self.allow_origin.as_str()),
            ("access-control-allow-methods", self.allow_methods.as_str()),
            ("access-control-allow-headers", self.allow_headers.as_str()),
            ("access-control-max-age", max_age.as_str()),
        ]);
    }

    /// Answer to a browser preflight: `204`, no body, CORS headers only.
    pub fn preflight(&self) -> Response {
        let mut res = Response::status(Status::NoContent);
        self.apply(&mut res);
        res
    }
}
