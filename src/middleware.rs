use std::sync::Arc;

use async_trait::async_trait;

use crate::types::HttpResponse;
use crate::{context::Context, types::HttpRequest};

/// Hook run around a view. Returning `Some` short-circuits with that response.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn pre_process(
        &self,
        req: &mut HttpRequest,
        ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>>;

    async fn post_process(
        &self,
        req: &mut HttpRequest,
        res: &mut HttpResponse,
        ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>>;
}

pub async fn apply_middlewares_pre(
    req: &mut HttpRequest,
    ctx: &mut Context,
    middlewares: &[Arc<dyn Middleware>],
) -> anyhow::Result<Option<HttpResponse>> {
    for m in middlewares.iter() {
        match m.pre_process(req, ctx).await {
            Ok(None) => continue,
            other => return other,
        }
    }
    Ok(None)
}

pub async fn apply_middlewares_post(
    req: &mut HttpRequest,
    res: &mut HttpResponse,
    ctx: &mut Context,
    middlewares: &[Arc<dyn Middleware>],
) -> anyhow::Result<Option<HttpResponse>> {
    for m in middlewares.iter() {
        match m.post_process(req, res, ctx).await {
            Ok(None) => continue,
            other => return other,
        }
    }
    Ok(None)
}
