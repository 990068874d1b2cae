//! Health-check handler.
//!
//! `GET /api/health` answers without touching the upstream API. If the
//! process can respond to HTTP at all, it is healthy. Upstream reachability
//! shows up on `/api/stats` instead.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::request::Request;
use crate::response::Json;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub message: &'static str,
}

pub async fn status(_req: Request) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        message: "Podcast stats API is running",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::response::IntoResponse;

    #[tokio::test]
    async fn reports_ok_with_timestamp() {
        let res = status(Request::new(Method::Get, "/api/health")).await.into_response();
        assert_eq!(res.status_code(), 200);

        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["message"].is_string());
        let ts = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "bad timestamp {ts}");
    }
}
