//! HTTP status codes the service answers with on its own.
//!
//! Upstream statuses are mirrored verbatim as raw `u16` values through
//! [`ResponseBuilder::code`](crate::response::ResponseBuilder::code); this enum
//! only names the codes podstats produces itself.
//!
//! ```rust
//! use podstats::{Response, Status};
//!
//! Response::status(Status::NoContent);
//! Response::builder()
//!     .status(Status::NotFound)
//!     .json(br#"{"status":"not_found"}"#.to_vec());
//! ```

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                  // 200
    NoContent,           // 204

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    NotFound,            // 404
    MethodNotAllowed,    // 405

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::NoContent           => 204,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::InternalServerError => 500,
        }
    }
}
