pub mod cookie {
    use cookie::Cookie;
    use hyper::{header, HeaderMap};

    /// Every cookie sent in the `Cookie` headers of a request, in order.
    pub fn request_cookies(headers: &HeaderMap) -> Vec<Cookie<'static>> {
        let mut cookies = Vec::new();
        for value in headers.get_all(header::COOKIE) {
            let cookies_string = match value.to_str() {
                Ok(v) => v,
                Err(_) => {
                    log::warn!("skipping non-visible-ascii cookie header");
                    continue;
                }
            };
            for cookie in Cookie::split_parse(cookies_string) {
                let cookie = match cookie {
                    Ok(v) => v,
                    Err(_) => continue,
                };
                cookies.push(cookie.into_owned());
            }
        }
        cookies
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use hyper::header::HeaderValue;

        #[test]
        fn reads_every_cookie_header() {
            let mut headers = HeaderMap::new();
            headers.append(header::COOKIE, HeaderValue::from_static("a=1; b=2"));
            headers.append(header::COOKIE, HeaderValue::from_static("c=3"));

            let names: Vec<_> = request_cookies(&headers)
                .iter()
                .map(|c| c.name_value().0.to_owned())
                .collect();
            assert_eq!(names, vec!["a", "b", "c"]);
        }

        #[test]
        fn skips_unparsable_pairs() {
            let mut headers = HeaderMap::new();
            headers.insert(header::COOKIE, HeaderValue::from_static("novalue; a=1"));

            let cookies = request_cookies(&headers);
            assert_eq!(cookies.len(), 1);
            assert_eq!(cookies[0].value(), "1");
        }

        #[test]
        fn no_header_no_cookies() {
            assert!(request_cookies(&HeaderMap::new()).is_empty());
        }
    }
}
