//! A per-request cookie jar for hyper services.
//!
//! [`CookieJar`] reads the cookies of an incoming request, lets a handler
//! stage new cookies or removals, and writes the staged set back as
//! `Set-Cookie` headers. [`CookieJarMiddleware`] wires one jar into every
//! request handled through [`app_core`].

use std::sync::Arc;

use crate::context::Context;
use crate::middleware::{apply_middlewares_post, apply_middlewares_pre, Middleware};
use crate::types::{HttpRequest, HttpResponse};
use crate::view::View;

pub mod config;
pub mod context;
pub mod jar;
pub mod middleware;
pub mod middlewares;
pub mod response;
pub mod sink;
pub mod types;
pub mod utils;
pub mod view;

pub use jar::CookieJar;
pub use middlewares::CookieJarMiddleware;
pub use sink::ResponseSink;

/// Runs `view` wrapped in `middlewares`. Errors become a 500 response.
pub async fn app_core(
    view: &dyn View,
    middlewares: &[Arc<dyn Middleware>],
    mut req: HttpRequest,
) -> anyhow::Result<HttpResponse> {
    let mut ctx = Context::new();

    match apply_middlewares_pre(&mut req, &mut ctx, middlewares).await {
        Ok(None) => (),
        Ok(Some(v)) => return Ok(v),
        Err(e) => return response::internal_server_error(e),
    }

    let mut res = match view.call(&mut req, &mut ctx).await {
        Ok(r) => r,
        Err(e) => return response::internal_server_error(e),
    };

    match apply_middlewares_post(&mut req, &mut res, &mut ctx, middlewares).await {
        Ok(None) => Ok(res),
        Ok(Some(v)) => Ok(v),
        Err(e) => response::internal_server_error(e),
    }
}
