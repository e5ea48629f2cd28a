use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use cookie::Cookie;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use serde_json::json;
use simple_cookie_jar::{
    app_core,
    config::ServerConfig,
    context::Context,
    middleware::Middleware,
    response,
    types::{HttpRequest, HttpResponse},
    view::View,
    CookieJarMiddleware,
};
use tokio::net::TcpListener;

const VISITS_COOKIE: &str = "visits";

struct Index {
    cookie_path: String,
}

#[async_trait]
impl View for Index {
    async fn call(
        &self,
        _req: &mut HttpRequest,
        ctx: &mut Context,
    ) -> anyhow::Result<HttpResponse> {
        let jar = ctx.cookies_mut()?;
        let visits = jar
            .get(VISITS_COOKIE)
            .and_then(|c| c.value().parse::<u64>().ok())
            .unwrap_or(0)
            + 1;
        jar.set(
            Cookie::build(VISITS_COOKIE, visits.to_string())
                .path(self.cookie_path.clone())
                .http_only(true)
                .finish(),
        );
        ctx.set(VISITS_COOKIE, visits);
        response::ok_json(json!({ "visits": visits }))
    }
}

struct Logout {
    cookie_path: String,
}

#[async_trait]
impl View for Logout {
    async fn call(
        &self,
        _req: &mut HttpRequest,
        ctx: &mut Context,
    ) -> anyhow::Result<HttpResponse> {
        ctx.cookies_mut()?.remove(VISITS_COOKIE, &self.cookie_path);
        response::ok_json(json!({ "visits": 0 }))
    }
}

/// Logs the visit count a view left in the context.
struct VisitLog;

#[async_trait]
impl Middleware for VisitLog {
    async fn pre_process(
        &self,
        _req: &mut HttpRequest,
        _ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>> {
        Ok(None)
    }

    async fn post_process(
        &self,
        req: &mut HttpRequest,
        _res: &mut HttpResponse,
        ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>> {
        if let Some(visits) = ctx.get::<u64>(VISITS_COOKIE) {
            log::info!("{} visit #{}", req.uri().path(), visits);
        }
        Ok(None)
    }
}

struct App {
    index: Index,
    logout: Logout,
    middlewares: Vec<Arc<dyn Middleware>>,
}

async fn handle(app: Arc<App>, req: Request<Incoming>) -> anyhow::Result<HttpResponse> {
    let (parts, body) = req.into_parts();
    let body = body.collect().await?.to_bytes();
    let req = Request::from_parts(parts, Full::new(body));

    let path = req.uri().path().to_string();
    log::info!("{} {}", req.method(), path);
    let view: &dyn View = match path.as_str() {
        "/" => &app.index,
        "/logout" => &app.logout,
        _ => return response::not_found(&path),
    };
    app_core(view, &app.middlewares, req).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = ServerConfig::from_env()?;
    let app = Arc::new(App {
        index: Index {
            cookie_path: config.cookie_path.clone(),
        },
        logout: Logout {
            cookie_path: config.cookie_path.clone(),
        },
        middlewares: vec![Arc::new(CookieJarMiddleware), Arc::new(VisitLog)],
    });

    let addr = config.listen.parse::<SocketAddr>()?;
    let listener = TcpListener::bind(addr).await?;
    log::info!("listening on {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let app = app.clone();
        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle(app.clone(), req));
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                log::error!("Error serving connection: {:?}", err);
            }
        });
    }
}
