use async_trait::async_trait;

use crate::types::HttpResponse;
use crate::{context::Context, types::HttpRequest};

#[async_trait]
pub trait View: Send + Sync {
    async fn call(&self, req: &mut HttpRequest, ctx: &mut Context)
        -> anyhow::Result<HttpResponse>;
}
