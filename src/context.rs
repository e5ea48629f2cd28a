use std::any::Any;
use std::collections::HashMap;

use anyhow::anyhow;

use crate::jar::CookieJar;

static NO_COOKIE_JAR: &'static str = "no cookie jar, is CookieJarMiddleware installed?";

/// Per-request state shared by middlewares and the view.
pub struct Context {
    pub cookies: Option<CookieJar<'static>>,
    inner: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Context {
    pub fn new() -> Self {
        Context {
            cookies: None,
            inner: HashMap::new(),
        }
    }

    pub fn cookies_mut(&mut self) -> anyhow::Result<&mut CookieJar<'static>> {
        self.cookies.as_mut().ok_or(anyhow!(NO_COOKIE_JAR))
    }

    pub fn get<T: 'static + Send>(&self, key: &str) -> Option<&T> {
        self.inner.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn set<T: 'static + Send + Sync>(&mut self, key: &str, value: T) {
        self.inner.insert(key.to_string(), Box::new(value));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
