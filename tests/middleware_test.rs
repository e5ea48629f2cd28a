use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use cookie::Cookie;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{header, http::HeaderValue, Request, StatusCode};
use serde_json::json;
use simple_cookie_jar::{
    app_core,
    context::Context,
    middleware::Middleware,
    response,
    types::{HttpRequest, HttpResponse},
    view::View,
    CookieJarMiddleware,
};

fn request(cookies: &str) -> HttpRequest {
    Request::builder()
        .header(header::COOKIE, cookies)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn set_cookies(res: &HttpResponse) -> Vec<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_owned())
        .collect()
}

fn cookie_middlewares() -> Vec<Arc<dyn Middleware>> {
    vec![Arc::new(CookieJarMiddleware)]
}

struct Login;

#[async_trait]
impl View for Login {
    async fn call(
        &self,
        _req: &mut HttpRequest,
        ctx: &mut Context,
    ) -> anyhow::Result<HttpResponse> {
        let jar = ctx.cookies_mut()?;
        let seen = jar.get("visitor").map(|c| c.value().to_owned());
        jar.remove("visitor", "/");
        jar.set(Cookie::build("token", "t1").path("/").finish());

        let mut res = response::ok_json(json!({ "visitor": seen }))?;
        res.headers_mut()
            .append(header::SET_COOKIE, HeaderValue::from_static("manual=1"));
        Ok(res)
    }
}

struct Failing;

#[async_trait]
impl View for Failing {
    async fn call(
        &self,
        _req: &mut HttpRequest,
        _ctx: &mut Context,
    ) -> anyhow::Result<HttpResponse> {
        Err(anyhow!("boom"))
    }
}

struct NeedsJar;

#[async_trait]
impl View for NeedsJar {
    async fn call(
        &self,
        _req: &mut HttpRequest,
        ctx: &mut Context,
    ) -> anyhow::Result<HttpResponse> {
        ctx.cookies_mut()?.set(Cookie::new("a", "1"));
        response::ok_json(json!({}))
    }
}

struct Deny;

#[async_trait]
impl Middleware for Deny {
    async fn pre_process(
        &self,
        _req: &mut HttpRequest,
        _ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>> {
        Ok(Some(response::ret_json(
            StatusCode::UNAUTHORIZED,
            json!({ "msg": "Unauthed" }),
        )?))
    }

    async fn post_process(
        &self,
        _req: &mut HttpRequest,
        _res: &mut HttpResponse,
        _ctx: &mut Context,
    ) -> anyhow::Result<Option<HttpResponse>> {
        Ok(None)
    }
}

#[tokio::test]
async fn test_middleware_writes_staged_cookies() {
    let res = app_core(&Login, &cookie_middlewares(), request("visitor=v1"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let written = set_cookies(&res);
    assert_eq!(written.len(), 2);
    assert_eq!(written[0], "token=t1; Path=/");
    assert!(written[1].starts_with("visitor=;"));
    assert!(written[1].contains("Max-Age=0"));
    assert!(!written.iter().any(|c| c.starts_with("manual=")));
}

#[tokio::test]
async fn test_view_error_becomes_500() {
    let res = app_core(&Failing, &cookie_middlewares(), request("a=1"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookies(&res).is_empty());
}

#[tokio::test]
async fn test_view_without_jar_middleware_fails() {
    let res = app_core(&NeedsJar, &[], request("a=1")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_pre_process_short_circuits() {
    let middlewares: Vec<Arc<dyn Middleware>> =
        vec![Arc::new(Deny), Arc::new(CookieJarMiddleware)];
    let res = app_core(&NeedsJar, &middlewares, request("a=1"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(set_cookies(&res).is_empty());
}
