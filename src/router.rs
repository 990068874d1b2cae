//! Request router.
//!
//! One radix tree per HTTP method, exact paths only. The router owns the
//! per-request policy around the handlers:
//!
//! 1. `OPTIONS` on any path is a CORS preflight and never reaches a handler.
//! 2. A registered method + path runs its handler on its own task.
//! 3. A path registered under other methods answers `405` with `Allow`.
//! 4. Anything else goes to the fallback handler (plain `404` if none).
//!
//! The CORS header set is attached to every response on the way out.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use matchit::Router as MatchitRouter;
use tracing::{error, info};

use crate::cors::CorsPolicy;
use crate::error::ApiError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Each builder call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    paths: Vec<String>,
    fallback: Option<BoxedHandler>,
    cors: CorsPolicy,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            paths: Vec::new(),
            fallback: None,
            cors: CorsPolicy::default(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// # Panics
    ///
    /// Panics if the path is not a valid route or is already registered for
    /// `method`. Routes are fixed at startup, so this is a programming error.
    ///
    /// ```rust
    /// # use podstats::{Method, Request, Response, Router};
    /// # async fn health(_: Request) -> Response { Response::text("ok") }
    /// Router::new().on(Method::Get, "/api/health", health);
    /// ```
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        if !self.paths.iter().any(|p| p == path) {
            self.paths.push(path.to_owned());
        }
        self
    }

    /// Handler for requests whose path matches no registered route.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    /// CORS headers attached to every response and used for preflights.
    pub fn cors(mut self, policy: CorsPolicy) -> Self {
        self.cors = policy;
        self
    }

    /// Every registered path, in registration order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Routes one request and produces one response. Never fails: handler
    /// errors and panics are turned into responses here.
    pub async fn handle(&self, req: Request) -> Response {
        let started = Instant::now();
        let method = req.method();
        let path = req.path().to_owned();

        let mut res = if method == Method::Options {
            self.cors.preflight()
        } else if let Some(handler) = self.lookup(method, &path) {
            run_isolated(handler, req).await
        } else {
            let allowed = self.allowed_methods(&path);
            if !allowed.is_empty() {
                method_not_allowed(&allowed)
            } else if let Some(fallback) = &self.fallback {
                run_isolated(Arc::clone(fallback), req).await
            } else {
                Response::status(Status::NotFound)
            }
        };

        self.cors.apply(&mut res);
        info!(
            %method,
            path = %path,
            status = res.status_code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request handled"
        );
        res
    }

    pub(crate) fn lookup(&self, method: Method, path: &str) -> Option<BoxedHandler> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        Some(Arc::clone(matched.value))
    }

    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        allowed.sort();
        allowed
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Runs a handler on its own task so a panic fails only this request.
async fn run_isolated(handler: BoxedHandler, req: Request) -> Response {
    match tokio::spawn(handler.call(req)).await {
        Ok(res) => res,
        Err(e) => {
            error!("handler task failed: {e}");
            ApiError::Internal("request handler failed unexpectedly".to_owned()).into_response()
        }
    }
}

fn method_not_allowed(allowed: &[Method]) -> Response {
    let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
    Response::builder()
        .status(Status::MethodNotAllowed)
        .header("allow", &allow)
        .text("Method Not Allowed")
}
