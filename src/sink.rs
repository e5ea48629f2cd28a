use hyper::{HeaderMap, Response};

/// Destination a [`CookieJar`](crate::jar::CookieJar) writes `Set-Cookie` headers to.
pub trait ResponseSink: Send + Sync {
    fn headers_mut(&mut self) -> &mut HeaderMap;
}

impl ResponseSink for HeaderMap {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self
    }
}

impl<B: Send + Sync> ResponseSink for Response<B> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }
}
