use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};

pub type HttpRequest = Request<Full<Bytes>>;

pub type HttpResponse = Response<Full<Bytes>>;
