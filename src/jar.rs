use std::collections::{BTreeMap, HashMap};

use anyhow::anyhow;
use cookie::time::{Duration, OffsetDateTime};
use cookie::Cookie;
use hyper::{header, http::HeaderValue, HeaderMap, Request};

use crate::sink::ResponseSink;
use crate::utils;

static NO_SINK: &'static str = "cookie jar has no response sink, use write_to";

/// Cookies of a single request/response exchange.
///
/// Cookies read from the request are kept apart from the ones staged for the
/// response. Nothing reaches the response until [`CookieJar::write`] or
/// [`CookieJar::write_to`] is called, and a write replaces every `Set-Cookie`
/// header already present on it.
pub struct CookieJar<'s> {
    incoming: HashMap<String, Cookie<'static>>,
    outgoing: BTreeMap<String, Cookie<'static>>,
    sink: Option<&'s mut dyn ResponseSink>,
}

impl<'s> CookieJar<'s> {
    pub fn new<B>(request: &Request<B>, sink: &'s mut dyn ResponseSink) -> Self {
        let mut jar = Self::from_headers(request.headers());
        jar.sink = Some(sink);
        jar
    }

    /// Builds a jar without a sink, e.g. to only inspect the request cookies.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self::from_headers(request.headers())
    }

    /// Later cookies with the same name overwrite earlier ones.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming = HashMap::new();
        for cookie in utils::cookie::request_cookies(headers) {
            incoming.insert(cookie.name().to_owned(), cookie);
        }
        log::trace!("cookie jar opened with {} request cookies", incoming.len());
        CookieJar {
            incoming,
            outgoing: BTreeMap::new(),
            sink: None,
        }
    }

    pub fn set_sink(&mut self, sink: &'s mut dyn ResponseSink) {
        self.sink = Some(sink);
    }

    /// Stages `cookie`, replacing anything staged under the same name.
    pub fn set(&mut self, cookie: Cookie<'static>) {
        log::debug!("staging cookie {}", cookie.name());
        self.outgoing.insert(cookie.name().to_owned(), cookie);
    }

    /// Asks the client to drop `name`, or unstages it if the request never sent it.
    ///
    /// Browsers only delete a cookie whose path matches the one it was set
    /// with, and the request does not tell us that path, so the caller has to.
    pub fn remove(&mut self, name: &str, path: &str) {
        let Some(original) = self.incoming.get(name) else {
            if self.outgoing.remove(name).is_some() {
                log::debug!("unstaged cookie {}", name);
            }
            return;
        };

        let mut removal = original.clone();
        removal.set_max_age(Duration::ZERO);
        removal.set_expires(OffsetDateTime::now_utc() - Duration::hours(1));
        removal.set_value("");
        removal.set_path(path.to_owned());
        log::debug!("staging removal of cookie {} at {}", name, path);
        self.outgoing.insert(name.to_owned(), removal);
    }

    /// The staged cookie if there is one, otherwise the request's.
    pub fn get(&self, name: &str) -> Option<&Cookie<'static>> {
        self.outgoing.get(name).or_else(|| self.incoming.get(name))
    }

    /// Computes the expiry of `name` pushed forward by `by`.
    ///
    /// The result is neither stored back nor staged, so this does not change
    /// what gets written. Stage an updated cookie with [`CookieJar::set`] to
    /// really extend one.
    pub fn extend(&self, name: &str, by: Duration) {
        let Some(cookie) = self.get(name) else {
            return;
        };
        let Some(at) = cookie.expires_datetime() else {
            log::debug!("extend {}: no expiry to push forward", name);
            return;
        };
        match at.checked_add(by) {
            Some(extended) => {
                log::debug!("extend {}: computed expiry {}, not staged", name, extended);
            }
            None => log::warn!("extend {}: expiry {} + {} is out of range", name, at, by),
        }
    }

    pub fn len_staged(&self) -> usize {
        self.outgoing.len()
    }

    pub fn incoming(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.incoming.values()
    }

    /// Staged cookies, ordered by name.
    pub fn outgoing(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.outgoing.values()
    }

    /// Writes the staged cookies to the sink given at construction.
    pub fn write(&mut self) -> anyhow::Result<()> {
        let sink = self.sink.as_deref_mut().ok_or(anyhow!(NO_SINK))?;
        write_cookies(&self.outgoing, sink.headers_mut());
        Ok(())
    }

    pub fn write_to<S: ResponseSink + ?Sized>(&self, sink: &mut S) {
        write_cookies(&self.outgoing, sink.headers_mut());
    }
}

// RFC 6265 token characters.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

// RFC 6265 cookie-octet.
fn is_value_byte(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2b | 0x2d..=0x3a | 0x3c..=0x5b | 0x5d..=0x7e)
}

/// Empty when the name is not a token or the value holds a byte a
/// `Set-Cookie` value cannot carry.
fn serialized_form(cookie: &Cookie<'_>) -> String {
    let name = cookie.name();
    if name.is_empty() || !name.bytes().all(is_name_byte) {
        return String::new();
    }
    if !cookie.value().bytes().all(is_value_byte) {
        return String::new();
    }
    cookie.to_string()
}

fn write_cookies(outgoing: &BTreeMap<String, Cookie<'static>>, headers: &mut HeaderMap) {
    headers.remove(header::SET_COOKIE);
    for cookie in outgoing.values() {
        let serialized = serialized_form(cookie);
        if serialized.is_empty() {
            log::warn!("skipping invalid cookie {:?}", cookie.name());
            continue;
        }
        match HeaderValue::from_str(&serialized) {
            Ok(v) => {
                headers.append(header::SET_COOKIE, v);
            }
            Err(e) => log::warn!("skipping cookie {}: {}", cookie.name(), e),
        }
    }
}
