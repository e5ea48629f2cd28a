use async_trait::async_trait;

use crate::jar::CookieJar;
use crate::middleware::Middleware;
use crate::types::HttpResponse;
use crate::{context::Context, types::HttpRequest};

/// Opens a [`CookieJar`] for every request and writes it onto the response.
///
/// Views reach the jar through [`Context::cookies_mut`]. Any `Set-Cookie`
/// header a view adds by hand is dropped when the jar is written.
pub struct CookieJarMiddleware;

#[async_trait]
impl Middleware for CookieJarMiddleware {
    async fn pre_process(
        &self,
        req: &mut HttpRequest,
        ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>> {
        ctx.cookies = Some(CookieJar::from_headers(req.headers()));
        Ok(None)
    }

    async fn post_process(
        &self,
        _req: &mut HttpRequest,
        res: &mut HttpResponse,
        ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>> {
        if let Some(jar) = ctx.cookies.take() {
            log::debug!("writing {} staged cookies", jar.len_staged());
            jar.write_to(res);
        }
        Ok(None)
    }
}
