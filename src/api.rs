//! The podcast stats API: route table and handlers.
//!
//! | Path | Handler |
//! |---|---|
//! | `GET /api/health`   | static status payload |
//! | `GET /api/stats`    | download summary from the upstream episode list |
//! | `GET /api/episodes` | upstream episode list, passed through |
//!
//! Anything else is a `404` naming the paths above.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::cors::CorsPolicy;
use crate::error::ApiError;
use crate::health;
use crate::method::Method;
use crate::model::PodcastStats;
use crate::request::Request;
use crate::response::{Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::upstream::EpisodeSource;

pub const HEALTH_PATH: &str = "/api/health";
pub const STATS_PATH: &str = "/api/stats";
pub const EPISODES_PATH: &str = "/api/episodes";

/// Builds the application router over `source`.
pub fn router(source: Arc<dyn EpisodeSource>, cors: CorsPolicy) -> Router {
    let stats_source = Arc::clone(&source);
    let episodes_source = source;

    let router = Router::new()
        .cors(cors)
        .on(Method::Get, HEALTH_PATH, health::status)
        .on(Method::Get, STATS_PATH, move |_req: Request| stats(Arc::clone(&stats_source)))
        .on(Method::Get, EPISODES_PATH, move |_req: Request| episodes(Arc::clone(&episodes_source)));

    let endpoints = router.paths().to_vec();
    router.fallback(move |req: Request| not_found(endpoints.clone(), req))
}

async fn stats(source: Arc<dyn EpisodeSource>) -> Result<Json<PodcastStats>, ApiError> {
    Ok(Json(source.fetch_stats().await?))
}

async fn episodes(source: Arc<dyn EpisodeSource>) -> Result<Json<Vec<Value>>, ApiError> {
    Ok(Json(source.fetch_raw_episodes().await?))
}

async fn not_found(endpoints: Vec<String>, req: Request) -> Response {
    let body = json!({
        "status": "not_found",
        "message": format!("No endpoint at {}", req.path()),
        "available_endpoints": endpoints,
    });
    Response::builder()
        .status(Status::NotFound)
        .json(body.to_string().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::upstream::UpstreamError;

    /// Counts calls so tests can assert the upstream was never touched.
    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EpisodeSource for Counting {
        async fn fetch_raw_episodes(&self) -> Result<Vec<Value>, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![json!({ "id": 1, "title": "Ep1", "published_at": "2024-01-01", "total_plays": 3 })])
        }
    }

    fn app() -> (Arc<Counting>, Router) {
        let source = Arc::new(Counting::default());
        let router = router(source.clone(), CorsPolicy::default());
        (source, router)
    }

    #[tokio::test]
    async fn table_of_requests() {
        let cases: &[(Method, &str, u16, usize)] = &[
            (Method::Get,       HEALTH_PATH,    200, 0),
            (Method::Get,       STATS_PATH,     200, 1),
            (Method::Get,       EPISODES_PATH,  200, 1),
            (Method::Post,      STATS_PATH,     405, 0),
            (Method::Put,       EPISODES_PATH,  405, 0),
            (Method::Delete,    HEALTH_PATH,    405, 0),
            (Method::Options,   STATS_PATH,     204, 0),
            (Method::Options,   "/api/unknown", 204, 0),
            (Method::Get,       "/api/unknown", 404, 0),
            (Method::Post,      "/",            404, 0),
            (Method::Extension, STATS_PATH,     405, 0),
            (Method::Extension, "/api/unknown", 404, 0),
        ];

        for &(method, path, status, upstream_calls) in cases {
            let (source, app) = app();
            let res = app.handle(Request::new(method, path)).await;
            assert_eq!(res.status_code(), status, "{method} {path}");
            assert_eq!(source.calls.load(Ordering::SeqCst), upstream_calls, "{method} {path}");
            assert_eq!(res.header("access-control-allow-origin"), Some("*"), "{method} {path}");
        }
    }

    #[tokio::test]
    async fn not_found_lists_exactly_the_api_paths() {
        let (_, app) = app();
        let res = app.handle(Request::new(Method::Get, "/api/unknown")).await;
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "not_found");
        assert_eq!(body["available_endpoints"], json!([HEALTH_PATH, STATS_PATH, EPISODES_PATH]));
        assert!(body["message"].as_str().unwrap().contains("/api/unknown"));
    }

    #[tokio::test]
    async fn episodes_pass_through_untouched() {
        let (_, app) = app();
        let res = app.handle(Request::new(Method::Get, EPISODES_PATH)).await;
        let body: Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body, json!([{ "id": 1, "title": "Ep1", "published_at": "2024-01-01", "total_plays": 3 }]));
    }
}
